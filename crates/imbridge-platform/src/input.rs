//! Host input to GUI input translation
//!
//! Runs once per update tick before any UI code. Every step is infallible:
//! absent devices simply contribute no events.

use imbridge_core::{
    bridge_debug_rate_limited, BackendFlags, GuiIo, GuiKey, HostKey, InputConfig, LogCategory,
    MouseButton, GAMEPAD_AXIS_MAP, GAMEPAD_BUTTON_MAP, KEY_MAP,
};

use crate::host::{HostFrame, HostInput};

/// What one translation pass pushed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    pub events_pushed: usize,
    pub focused: bool,
    /// Whether the gamepad section ran
    pub gamepad: bool,
}

/// Feeds polled host state into the GUI library's input queue
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    config: InputConfig,
}

impl InputTranslator {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Push one tick of input; with `enable_input` off only timing, display
    /// size and a lost-focus event reach the GUI
    pub fn translate<I, H, F>(
        &self,
        io: &mut I,
        host: &H,
        frame: &F,
        enable_input: bool,
    ) -> InputStats
    where
        I: GuiIo + ?Sized,
        H: HostInput + ?Sized,
        F: HostFrame + ?Sized,
    {
        io.set_delta_time(frame.unscaled_delta_time());
        io.set_display_size(frame.screen_size());

        let focused = host.has_focus() && enable_input;
        io.add_focus_event(focused);
        let mut stats = InputStats {
            events_pushed: 1,
            focused,
            gamepad: false,
        };
        if !focused {
            return stats;
        }

        stats.events_pushed += push_mouse(io, host);
        stats.events_pushed += push_text(io, host);
        stats.events_pushed += push_keys(io, host);

        if io.backend_flags().contains(BackendFlags::HAS_GAMEPAD) && host.gamepad_count() > 0 {
            stats.gamepad = true;
            stats.events_pushed += self.push_gamepad(io, host);
        }

        bridge_debug_rate_limited!(
            LogCategory::Input,
            "translated {} input events (gamepad: {})",
            stats.events_pushed,
            stats.gamepad
        );
        stats
    }

    fn push_gamepad<I, H>(&self, io: &mut I, host: &H) -> usize
    where
        I: GuiIo + ?Sized,
        H: HostInput + ?Sized,
    {
        let pad = self.config.gamepad_index;
        let mut pushed = 0;

        for &(key, button) in GAMEPAD_BUTTON_MAP {
            io.add_key_event(key, host.gamepad_button_down(pad, button));
            pushed += 1;
        }

        for binding in GAMEPAD_AXIS_MAP {
            let value = host.gamepad_axis(pad, binding.axis);
            let dead_zone = if binding.is_trigger {
                self.config.trigger_dead_zone
            } else {
                self.config.stick_dead_zone
            };

            let (down, magnitude) = analog_state(value, dead_zone);
            io.add_key_analog_event(binding.positive, down, magnitude);
            pushed += 1;

            if let Some(negative) = binding.negative {
                let (down, magnitude) = analog_state(-value, dead_zone);
                io.add_key_analog_event(negative, down, magnitude);
                pushed += 1;
            }
        }
        pushed
    }
}

/// Active only strictly past the dead zone; the value is passed through as is
pub fn analog_state(value: f32, dead_zone: f32) -> (bool, f32) {
    (value > dead_zone, value)
}

fn push_mouse<I, H>(io: &mut I, host: &H) -> usize
where
    I: GuiIo + ?Sized,
    H: HostInput + ?Sized,
{
    io.add_mouse_pos_event(host.mouse_position());
    for button in MouseButton::ALL {
        io.add_mouse_button_event(button.gui_index(), host.mouse_button_down(button));
    }
    io.add_mouse_wheel_event(host.scroll_delta());
    2 + MouseButton::ALL.len()
}

fn push_text<I, H>(io: &mut I, host: &H) -> usize
where
    I: GuiIo + ?Sized,
    H: HostInput + ?Sized,
{
    let mut pushed = 0;
    for unit in host.input_text().encode_utf16() {
        io.add_input_character_utf16(unit);
        pushed += 1;
    }
    pushed
}

fn push_keys<I, H>(io: &mut I, host: &H) -> usize
where
    I: GuiIo + ?Sized,
    H: HostInput + ?Sized,
{
    for &(gui, key) in KEY_MAP {
        io.add_key_event(gui, host.key_down(key));
    }
    let super_down = host.key_down(HostKey::LeftWindows) || host.key_down(HostKey::RightWindows);
    io.add_key_event(GuiKey::ModSuper, super_down);
    KEY_MAP.len() + 1
}
