//! The host engine as seen by the bridge
//!
//! Input is polled, not pushed: once per update tick the translator reads
//! the current device state through [`HostInput`] and the frame timing
//! through [`HostFrame`].

use std::collections::HashSet;

use glam::Vec2;
use imbridge_core::{GamepadAxis, GamepadButton, HostKey, MouseButton};

/// Polled device state of the host
pub trait HostInput {
    /// Whether the host viewport currently has keyboard focus
    fn has_focus(&self) -> bool;

    /// Pointer position in screen pixels
    fn mouse_position(&self) -> Vec2;

    fn mouse_button_down(&self, button: MouseButton) -> bool;

    /// Scroll delta accumulated since the last tick, in lines
    fn scroll_delta(&self) -> Vec2;

    /// Characters typed since the last tick
    fn input_text(&self) -> &str;

    fn key_down(&self, key: HostKey) -> bool;

    fn gamepad_count(&self) -> usize;

    fn gamepad_button_down(&self, pad: usize, button: GamepadButton) -> bool;

    /// Stick axes in `[-1, 1]`, triggers in `[0, 1]`
    fn gamepad_axis(&self, pad: usize, axis: GamepadAxis) -> f32;
}

/// Frame timing and display metrics of the host
pub trait HostFrame {
    /// Seconds since the previous frame, ignoring any time scale
    fn unscaled_delta_time(&self) -> f32;

    /// Screen size in pixels
    fn screen_size(&self) -> Vec2;

    /// Display scale relative to 96 DPI
    fn dpi_scale(&self) -> f32;
}

/// State of one gamepad
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    pub buttons: HashSet<GamepadButton>,
    pub axes: Vec<(GamepadAxis, f32)>,
}

impl GamepadState {
    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        self.axes
            .iter()
            .find(|(a, _)| *a == axis)
            .map(|(_, value)| *value)
            .unwrap_or(0.0)
    }

    pub fn set_axis(&mut self, axis: GamepadAxis, value: f32) {
        match self.axes.iter_mut().find(|(a, _)| *a == axis) {
            Some(entry) => entry.1 = value,
            None => self.axes.push((axis, value)),
        }
    }
}

/// A plain snapshot of host state implementing both host traits
///
/// Hosts without a native polling API fill one of these per tick. The
/// winit adapter keeps one up to date from window events.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub focused: bool,
    pub mouse_position: Vec2,
    pub mouse_buttons: [bool; 3],
    pub scroll_delta: Vec2,
    pub text: String,
    pub keys_down: HashSet<HostKey>,
    pub gamepads: Vec<GamepadState>,
    pub delta_time: f32,
    pub screen_size: Vec2,
    pub dpi_scale: f32,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            focused: true,
            mouse_position: Vec2::ZERO,
            mouse_buttons: [false; 3],
            scroll_delta: Vec2::ZERO,
            text: String::new(),
            keys_down: HashSet::new(),
            gamepads: Vec::new(),
            delta_time: 1.0 / 60.0,
            screen_size: Vec2::new(1280.0, 720.0),
            dpi_scale: 1.0,
        }
    }
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: HostKey, down: bool) {
        if down {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        self.mouse_buttons[button.gui_index()] = down;
    }

    /// Clear per-tick accumulators once the GUI has consumed them
    pub fn end_tick(&mut self) {
        self.scroll_delta = Vec2::ZERO;
        self.text.clear();
    }
}

impl HostInput for InputSnapshot {
    fn has_focus(&self) -> bool {
        self.focused
    }

    fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons[button.gui_index()]
    }

    fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    fn input_text(&self) -> &str {
        &self.text
    }

    fn key_down(&self, key: HostKey) -> bool {
        self.keys_down.contains(&key)
    }

    fn gamepad_count(&self) -> usize {
        self.gamepads.len()
    }

    fn gamepad_button_down(&self, pad: usize, button: GamepadButton) -> bool {
        self.gamepads
            .get(pad)
            .is_some_and(|state| state.buttons.contains(&button))
    }

    fn gamepad_axis(&self, pad: usize, axis: GamepadAxis) -> f32 {
        self.gamepads.get(pad).map_or(0.0, |state| state.axis(axis))
    }
}

impl HostFrame for InputSnapshot {
    fn unscaled_delta_time(&self) -> f32 {
        self.delta_time
    }

    fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    fn dpi_scale(&self) -> f32 {
        self.dpi_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_pad_reads_neutral() {
        let snapshot = InputSnapshot::new();
        assert_eq!(snapshot.gamepad_count(), 0);
        assert!(!snapshot.gamepad_button_down(0, GamepadButton::A));
        assert_eq!(snapshot.gamepad_axis(0, GamepadAxis::LeftStickX), 0.0);
    }

    #[test]
    fn test_axis_overwrite() {
        let mut pad = GamepadState::default();
        pad.set_axis(GamepadAxis::LeftTrigger, 0.3);
        pad.set_axis(GamepadAxis::LeftTrigger, 0.7);
        assert_eq!(pad.axes.len(), 1);
        assert_eq!(pad.axis(GamepadAxis::LeftTrigger), 0.7);
    }

    #[test]
    fn test_end_tick_keeps_held_state() {
        let mut snapshot = InputSnapshot::new();
        snapshot.text.push('x');
        snapshot.scroll_delta = Vec2::Y;
        snapshot.set_key(HostKey::A, true);
        snapshot.set_mouse_button(MouseButton::Right, true);

        snapshot.end_tick();

        assert!(snapshot.input_text().is_empty());
        assert_eq!(snapshot.scroll_delta(), Vec2::ZERO);
        assert!(snapshot.key_down(HostKey::A));
        assert!(snapshot.mouse_button_down(MouseButton::Right));
    }
}
