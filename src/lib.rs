//! imbridge - drive an immediate-mode GUI from a host engine
//!
//! imbridge sits between an immediate-mode GUI library and a host engine.
//! Each frame it feeds host input into the GUI, keeps the GUI's textures
//! mirrored on the GPU and replays the finalized draw lists through the
//! host's 2D renderer.
//!
//! ```rust,ignore
//! use imbridge::prelude::*;
//!
//! let mut bridge: Bridge<MyGui, WgpuBackend> = InitBuilder::new()
//!     .with_config(BridgeConfig::default())
//!     .build(my_gui, window.scale_factor() as f32)?;
//!
//! // every frame
//! bridge.update(input.snapshot());
//! build_ui(bridge.gui_mut());
//! bridge.late_update();
//! bridge.post_render(&mut backend, target)?;
//! ```

pub use imbridge_core;
pub use imbridge_platform;
pub use imbridge_renderer;

pub use imbridge_platform::{Bridge, InitBuilder};

/// Unified prelude module that exports all commonly used types
pub mod prelude {
    pub use imbridge_core::prelude::*;
    pub use imbridge_core::{BridgeError, GuiIo, InputConfig, TextureConfig};
    pub use imbridge_platform::{
        Bridge, HostFrame, HostInput, InitBuilder, InputSnapshot, InputStats,
    };
    pub use imbridge_renderer::{
        CommandRecorder, GpuTexture, GuiRenderer, Render2D, RenderStats, TextureBackend,
        WgpuBackend, WgpuTarget,
    };
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_versions_agree() {
        assert_eq!(VERSION, imbridge_core::VERSION);
    }
}
