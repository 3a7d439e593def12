//! Input events queued for the GUI library

use glam::Vec2;

use crate::gui::{BackendFlags, GuiIo};
use crate::keys::GuiKey;

/// One entry in the GUI library's input queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Host viewport gained or lost focus
    Focus(bool),
    /// Pointer moved
    MousePos(Vec2),
    /// Mouse button changed; index per the GUI library
    MouseButton { button: usize, down: bool },
    /// Wheel scrolled
    MouseWheel(Vec2),
    /// One UTF-16 code unit of typed text
    Char(u16),
    /// Digital key state
    Key { key: GuiKey, down: bool },
    /// Analog key state with its raw magnitude
    KeyAnalog { key: GuiKey, down: bool, value: f32 },
}

/// Recording implementation of [`GuiIo`].
///
/// Collects a frame's worth of input so a GUI adapter can drain it into the
/// real library, or a test can inspect exactly what was pushed.
#[derive(Debug, Clone)]
pub struct EventQueue {
    backend_flags: BackendFlags,
    delta_time: f32,
    display_size: Vec2,
    events: Vec<InputEvent>,
}

impl EventQueue {
    pub fn new(backend_flags: BackendFlags) -> Self {
        Self {
            backend_flags,
            delta_time: 0.0,
            display_size: Vec2::ZERO,
            events: Vec::new(),
        }
    }

    pub fn set_backend_flags(&mut self, flags: BackendFlags) {
        self.backend_flags = flags;
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn display_size(&self) -> Vec2 {
        self.display_size
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Remove and return everything queued so far
    pub fn drain(&mut self) -> std::vec::Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Last queued state for a digital or analog key
    pub fn last_key_state(&self, key: GuiKey) -> Option<bool> {
        self.events.iter().rev().find_map(|event| match *event {
            InputEvent::Key { key: k, down } | InputEvent::KeyAnalog { key: k, down, .. }
                if k == key =>
            {
                Some(down)
            }
            _ => None,
        })
    }

    /// Decode queued characters back into a string
    pub fn text(&self) -> String {
        let units: Vec<u16> = self
            .events
            .iter()
            .filter_map(|event| match *event {
                InputEvent::Char(unit) => Some(unit),
                _ => None,
            })
            .collect();
        String::from_utf16_lossy(&units)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(BackendFlags::DEFAULT)
    }
}

impl GuiIo for EventQueue {
    fn backend_flags(&self) -> BackendFlags {
        self.backend_flags
    }

    fn set_delta_time(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
    }

    fn set_display_size(&mut self, size: Vec2) {
        self.display_size = size;
    }

    fn add_focus_event(&mut self, focused: bool) {
        self.events.push(InputEvent::Focus(focused));
    }

    fn add_mouse_pos_event(&mut self, pos: Vec2) {
        self.events.push(InputEvent::MousePos(pos));
    }

    fn add_mouse_button_event(&mut self, button: usize, down: bool) {
        self.events.push(InputEvent::MouseButton { button, down });
    }

    fn add_mouse_wheel_event(&mut self, wheel: Vec2) {
        self.events.push(InputEvent::MouseWheel(wheel));
    }

    fn add_input_character_utf16(&mut self, unit: u16) {
        self.events.push(InputEvent::Char(unit));
    }

    fn add_key_event(&mut self, key: GuiKey, down: bool) {
        self.events.push(InputEvent::Key { key, down });
    }

    fn add_key_analog_event(&mut self, key: GuiKey, down: bool, value: f32) {
        self.events.push(InputEvent::KeyAnalog { key, down, value });
    }
}
