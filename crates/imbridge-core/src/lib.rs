//! Core types for imbridge
//!
//! This crate holds everything the renderer and platform halves of the bridge
//! share: the GUI library's draw data and texture model, the host/GUI key
//! tables, the traits the bridge drives the GUI library through, and the
//! ambient configuration, error and logging layers.

pub mod config;
pub mod draw_data;
pub mod error;
pub mod event;
pub mod gui;
pub mod keys;
pub mod logging;
pub mod texture;
pub mod types;

pub use config::{BridgeConfig, InputConfig, LoggingConfig, TextureConfig};
pub use draw_data::{DrawCallback, DrawCmd, DrawData, DrawList, DrawVert};
pub use error::{BridgeError, ErrorContext, Result};
pub use event::{EventQueue, InputEvent};
pub use gui::{BackendFlags, ConfigFlags, ContextSettings, GuiContext, GuiIo, GuiStyle};
pub use keys::{
    AxisBinding, GamepadAxis, GamepadButton, GuiKey, HostKey, MouseButton, GAMEPAD_AXIS_MAP,
    GAMEPAD_BUTTON_MAP, KEY_MAP,
};
pub use logging::{LogCategory, LogLevel};
pub use texture::{TextureData, TextureFormat, TextureId, TextureRect, TextureStatus};
pub use types::{ClipRect, Color32, Rect};

pub use glam;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        config::BridgeConfig,
        draw_data::{DrawCmd, DrawData, DrawList, DrawVert},
        error::{BridgeError, Result},
        gui::{BackendFlags, ConfigFlags, GuiContext, GuiIo, GuiStyle},
        keys::{GuiKey, HostKey, MouseButton},
        logging::{LogCategory, LogLevel},
        texture::{TextureData, TextureId, TextureStatus},
        types::{ClipRect, Color32},
    };
}

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize core logging with the given configuration
pub fn init(config: &LoggingConfig) -> Result<()> {
    logging::init(config).map_err(|e| {
        BridgeError::initialization(format!("Failed to initialize logging: {}", e))
    })?;

    bridge_info!(LogCategory::Core, "imbridge core v{} initialized", VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig::default();
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }
}
