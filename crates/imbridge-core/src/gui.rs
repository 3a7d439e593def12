//! The GUI library as seen by the bridge
//!
//! The immediate-mode GUI library is an external collaborator. These traits
//! are the narrow surface the bridge drives: an input queue fed once per
//! update tick, and a context that brackets each frame and hands over its
//! finalized draw data.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::draw_data::DrawData;
use crate::keys::GuiKey;

bitflags! {
    /// Feature switches applied to the GUI context at setup
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ConfigFlags: u32 {
        const NAV_ENABLE_KEYBOARD = 1 << 0;
        const NAV_ENABLE_GAMEPAD = 1 << 1;
        const NO_MOUSE = 1 << 4;
        const NO_MOUSE_CURSOR_CHANGE = 1 << 5;
        const DOCKING_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Capabilities the backend advertises to the GUI library
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BackendFlags: u32 {
        const HAS_GAMEPAD = 1 << 0;
        const HAS_MOUSE_CURSORS = 1 << 1;
        const HAS_SET_MOUSE_POS = 1 << 2;
        const RENDERER_HAS_VTX_OFFSET = 1 << 3;
        const RENDERER_HAS_TEXTURES = 1 << 4;
    }
}

impl ConfigFlags {
    /// Keyboard navigation and docking
    pub const DEFAULT: Self = Self::NAV_ENABLE_KEYBOARD.union(Self::DOCKING_ENABLE);
}

impl BackendFlags {
    /// Everything this bridge implements
    pub const DEFAULT: Self = Self::RENDERER_HAS_TEXTURES
        .union(Self::HAS_GAMEPAD)
        .union(Self::HAS_MOUSE_CURSORS)
        .union(Self::RENDERER_HAS_VTX_OFFSET);
}

/// Built-in style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GuiStyle {
    #[default]
    Dark,
    Light,
    Classic,
    /// Leave the style alone; the application configures it itself
    Custom,
}

/// Settings pushed into a freshly created context
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSettings {
    pub config_flags: ConfigFlags,
    pub backend_flags: BackendFlags,
    /// Persist window layout between runs
    pub save_settings: bool,
}

/// Per-frame input queue of the GUI library
pub trait GuiIo {
    /// Capabilities declared at setup
    fn backend_flags(&self) -> BackendFlags;

    fn set_delta_time(&mut self, delta_time: f32);

    fn set_display_size(&mut self, size: Vec2);

    fn add_focus_event(&mut self, focused: bool);

    fn add_mouse_pos_event(&mut self, pos: Vec2);

    /// `button` uses the GUI library's indices (0 = left, 1 = right, 2 = middle)
    fn add_mouse_button_event(&mut self, button: usize, down: bool);

    fn add_mouse_wheel_event(&mut self, wheel: Vec2);

    fn add_input_character_utf16(&mut self, unit: u16);

    fn add_key_event(&mut self, key: GuiKey, down: bool);

    /// `value` carries the raw analog magnitude even when `down` is false
    fn add_key_analog_event(&mut self, key: GuiKey, down: bool, value: f32);
}

/// A live GUI library context
pub trait GuiContext {
    type Io: GuiIo;

    fn io_mut(&mut self) -> &mut Self::Io;

    /// Apply setup-time flags
    fn configure(&mut self, settings: &ContextSettings);

    /// Load a style preset; `GuiStyle::Custom` is never passed
    fn apply_style(&mut self, style: GuiStyle);

    /// Scale style metrics and font rendering for the display DPI
    fn scale_all_sizes(&mut self, scale: f32);

    /// Start building a frame; UI code runs after this
    fn new_frame(&mut self);

    /// Whether the frame produced any window to render
    fn has_current_window(&self) -> bool;

    /// Finalize the frame into draw data
    fn render(&mut self);

    /// Draw data of the last finalized frame
    fn draw_data_mut(&mut self) -> Option<&mut DrawData>;

    /// Close out frame state after submission
    fn end_frame(&mut self);

    /// Destroy the context and any companion contexts
    fn shutdown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flag_sets() {
        assert!(ConfigFlags::DEFAULT.contains(ConfigFlags::DOCKING_ENABLE));
        assert!(!ConfigFlags::DEFAULT.contains(ConfigFlags::NAV_ENABLE_GAMEPAD));
        assert!(BackendFlags::DEFAULT.contains(BackendFlags::HAS_GAMEPAD));
        assert!(!BackendFlags::DEFAULT.contains(BackendFlags::HAS_SET_MOUSE_POS));
    }
}
