//! Step-by-step bridge initialization
//!
//! Loads and validates configuration, installs logging once, then hands out
//! a [`Bridge`] that is already set up for the display.

use std::path::Path;

use imbridge_core::{bridge_trace, BridgeConfig, GuiContext, LogCategory, Result};
use imbridge_renderer::Render2D;

use crate::bridge::Bridge;

/// Builder for step-by-step initialization
#[derive(Debug, Clone, Default)]
pub struct InitBuilder {
    config: BridgeConfig,
    core_initialized: bool,
}

impl InitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom configuration
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Read configuration from a JSON file
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.config = BridgeConfig::load(path)?;
        Ok(self)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Validate configuration and install logging
    pub fn init_core(&mut self) -> Result<&mut Self> {
        if self.core_initialized {
            return Ok(self);
        }

        self.config.validate()?;
        imbridge_core::init(&self.config.logging)?;
        self.core_initialized = true;

        bridge_trace!(LogCategory::Core, "core initialized");
        Ok(self)
    }

    /// Initialize core if needed, then wrap `gui` in a bridge that has
    /// already run [`Bridge::setup`] with `dpi_scale`
    pub fn build<G, B>(&mut self, gui: G, dpi_scale: f32) -> Result<Bridge<G, B>>
    where
        G: GuiContext,
        B: Render2D,
    {
        self.init_core()?;

        let mut bridge = Bridge::new(self.config.clone(), gui)?;
        bridge.setup(dpi_scale);
        bridge_trace!(LogCategory::Platform, "bridge built");
        Ok(bridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imbridge_core::BridgeError;

    #[test]
    fn test_init_core_is_idempotent() {
        let mut builder = InitBuilder::new();
        builder.init_core().unwrap();
        assert!(builder.core_initialized);
        builder.init_core().unwrap();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BridgeConfig::default();
        config.input.stick_dead_zone = 1.5;

        let mut builder = InitBuilder::new().with_config(config);
        let err = builder.init_core().unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
        assert!(!builder.core_initialized);
    }

    #[test]
    fn test_missing_config_file() {
        let result = InitBuilder::new().with_config_file("/nonexistent/imbridge.json");
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }
}
