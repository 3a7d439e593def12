//! Configuration system for imbridge

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, ErrorContext, Result};
use crate::gui::{BackendFlags, ConfigFlags, ContextSettings, GuiStyle};

/// Top-level bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Master switch; a disabled bridge begins no frames
    pub enabled: bool,
    /// Forward host input to the GUI library
    pub enable_input: bool,
    /// Submit draw data to the host renderer
    pub enable_drawing: bool,
    /// Persist the GUI library's window layout between runs
    pub save_settings: bool,
    pub style: GuiStyle,
    pub config_flags: ConfigFlags,
    pub backend_flags: BackendFlags,
    pub input: InputConfig,
    pub textures: TextureConfig,
    pub logging: LoggingConfig,
}

/// Input translation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Stick magnitude below which an axis reads as released
    pub stick_dead_zone: f32,
    /// Trigger magnitude below which a trigger reads as released
    pub trigger_dead_zone: f32,
    /// Host gamepad polled for GUI navigation
    pub gamepad_index: usize,
}

/// Texture registry and lifecycle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Slots allocated up front
    pub initial_slots: usize,
    /// Frames a pending destroy may be deferred before it is forced;
    /// `None` defers for as long as the texture stays in use
    pub max_destroy_deferral: Option<u32>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Category-specific log levels (category name -> level string)
    pub category_levels: HashMap<String, String>,
    /// Rate limiting duration in seconds
    pub rate_limit_seconds: u64,
    /// Maximum number of messages before rate limiting kicks in
    pub max_rate_limit_count: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enable_input: true,
            enable_drawing: true,
            save_settings: true,
            style: GuiStyle::Dark,
            config_flags: ConfigFlags::DEFAULT,
            backend_flags: BackendFlags::DEFAULT,
            input: InputConfig::default(),
            textures: TextureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            stick_dead_zone: 0.2,
            trigger_dead_zone: 0.1,
            gamepad_index: 0,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            initial_slots: 1,
            max_destroy_deferral: Some(120),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut category_levels = HashMap::new();

        category_levels.insert("core".to_string(), "info".to_string());
        category_levels.insert("renderer".to_string(), "info".to_string());
        category_levels.insert("texture".to_string(), "info".to_string());
        category_levels.insert("input".to_string(), "warn".to_string()); // Per-frame noise otherwise
        category_levels.insert("platform".to_string(), "info".to_string());

        Self {
            category_levels,
            rate_limit_seconds: 5,
            max_rate_limit_count: 10,
        }
    }
}

impl BridgeConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json).map_err(|e| match e {
            BridgeError::Configuration { message, .. } => BridgeError::Configuration {
                message,
                context: Some(
                    ErrorContext::new("load", "config")
                        .with_metadata("path", path.display()),
                ),
            },
            other => other,
        })
    }

    /// Reject values the bridge cannot work with
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("input.stick_dead_zone", self.input.stick_dead_zone),
            ("input.trigger_dead_zone", self.input.trigger_dead_zone),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(BridgeError::configuration(format!(
                    "{} must be in [0, 1), got {}",
                    name, value
                )));
            }
        }

        if self.textures.initial_slots == 0 {
            return Err(BridgeError::configuration(
                "textures.initial_slots must be at least 1",
            ));
        }

        if self.textures.max_destroy_deferral == Some(0) {
            return Err(BridgeError::configuration(
                "textures.max_destroy_deferral must be at least 1 frame or null",
            ));
        }

        for (category, level) in &self.logging.category_levels {
            if crate::logging::LogLevel::from_str(level).is_none() {
                return Err(BridgeError::configuration(format!(
                    "unknown log level '{}' for category '{}'",
                    level, category
                )));
            }
        }

        Ok(())
    }

    /// Settings handed to the GUI context at setup
    pub fn context_settings(&self) -> ContextSettings {
        ContextSettings {
            config_flags: self.config_flags,
            backend_flags: self.backend_flags,
            save_settings: self.save_settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert!(config.enabled && config.enable_input && config.enable_drawing);
        assert_eq!(config.input.stick_dead_zone, 0.2);
        assert_eq!(config.input.trigger_dead_zone, 0.1);
        assert_eq!(config.textures.initial_slots, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_of_non_default_values() {
        let mut config = BridgeConfig::default();
        config.enable_drawing = false;
        config.style = GuiStyle::Light;
        config.backend_flags = BackendFlags::RENDERER_HAS_TEXTURES;
        config.textures.max_destroy_deferral = None;
        config.input.stick_dead_zone = 0.25;

        let json = config.to_json_string().unwrap();
        let parsed = BridgeConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = BridgeConfig::from_json_str(r#"{ "enable_input": false }"#).unwrap();
        assert!(!parsed.enable_input);
        assert_eq!(parsed.input, InputConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_dead_zone() {
        let err = BridgeConfig::from_json_str(r#"{ "input": { "stick_dead_zone": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_destroy_deferral() {
        let mut config = BridgeConfig::default();
        config.textures.max_destroy_deferral = Some(0);
        assert!(matches!(
            config.validate(),
            Err(BridgeError::Configuration { .. })
        ));

        config.textures.max_destroy_deferral = Some(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = BridgeConfig::default();
        config
            .logging
            .category_levels
            .insert("texture".to_string(), "loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = BridgeConfig::load("/nonexistent/imbridge.json").unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
