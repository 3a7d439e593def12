//! winit host adapter
//!
//! winit delivers input as events while the bridge polls state, so
//! [`WinitInput`] folds window events into an [`InputSnapshot`] that the
//! translator reads once per tick.

use std::collections::HashSet;
use std::time::Instant;

use glam::Vec2;
use imbridge_core::{HostKey, MouseButton};
use tracing::trace;
use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::host::InputSnapshot;

/// Pixels per scroll line for trackpad deltas
pub const PIXELS_PER_LINE: f32 = 20.0;

/// Window event accumulator for winit hosts
#[derive(Debug)]
pub struct WinitInput {
    snapshot: InputSnapshot,
    held: HashSet<KeyCode>,
    last_tick: Option<Instant>,
}

impl Default for WinitInput {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitInput {
    pub fn new() -> Self {
        Self {
            snapshot: InputSnapshot::default(),
            held: HashSet::new(),
            last_tick: None,
        }
    }

    /// Seed display metrics from the window at startup
    pub fn with_window_metrics(mut self, size: Vec2, scale_factor: f64) -> Self {
        self.snapshot.screen_size = size;
        self.snapshot.dpi_scale = scale_factor as f32;
        self
    }

    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    /// Fold one window event into the snapshot; returns whether it was used
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    _ => return false,
                };
                self.on_mouse_button(button, *state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => self.on_scroll(*delta),
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.on_key(code, pressed);
                }
                if pressed {
                    if let Some(text) = event.text.as_deref() {
                        self.on_text(text);
                    }
                }
            }
            WindowEvent::Ime(Ime::Commit(text)) => self.on_text(text),
            WindowEvent::Focused(focused) => {
                self.snapshot.focused = *focused;
                if !focused {
                    self.release_all_keys();
                }
            }
            WindowEvent::Resized(size) => {
                self.snapshot.screen_size = Vec2::new(size.width as f32, size.height as f32);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.snapshot.dpi_scale = *scale_factor as f32;
            }
            _ => return false,
        }
        true
    }

    pub fn on_cursor_moved(&mut self, position: Vec2) {
        self.snapshot.mouse_position = position;
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        self.snapshot.set_mouse_button(button, pressed);
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.snapshot.scroll_delta += match delta {
            MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
            MouseScrollDelta::PixelDelta(pos) => {
                Vec2::new(pos.x as f32, pos.y as f32) / PIXELS_PER_LINE
            }
        };
    }

    pub fn on_key(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(code);
        } else {
            self.held.remove(&code);
        }
        self.refresh_key(code);
    }

    /// Append typed text, dropping control characters
    pub fn on_text(&mut self, text: &str) {
        self.snapshot
            .text
            .extend(text.chars().filter(|c| !c.is_control()));
    }

    /// Stamp the frame delta; call once per tick before translating
    pub fn begin_tick(&mut self, now: Instant) {
        if let Some(last) = self.last_tick {
            self.snapshot.delta_time = now.saturating_duration_since(last).as_secs_f32();
        }
        self.last_tick = Some(now);
    }

    /// Clear scroll and text once the GUI has consumed them
    pub fn end_tick(&mut self) {
        self.snapshot.end_tick();
    }

    fn release_all_keys(&mut self) {
        trace!("focus lost, releasing {} held keys", self.held.len());
        self.held.clear();
        self.snapshot.keys_down.clear();
        self.snapshot.mouse_buttons = [false; 3];
    }

    fn refresh_key(&mut self, code: KeyCode) {
        let Some(key) = host_key(code) else {
            return;
        };
        let down = match key {
            HostKey::Control => self.any_held(&[KeyCode::ControlLeft, KeyCode::ControlRight]),
            HostKey::Shift => self.any_held(&[KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            HostKey::Alt => self.any_held(&[KeyCode::AltLeft, KeyCode::AltRight]),
            _ => self.held.contains(&code),
        };
        self.snapshot.set_key(key, down);
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|code| self.held.contains(code))
    }
}

/// Host key for a physical winit key code; sided modifiers fold into the
/// unified `Control`, `Shift` and `Alt`
pub fn host_key(code: KeyCode) -> Option<HostKey> {
    let key = match code {
        KeyCode::Tab => HostKey::Tab,
        KeyCode::ArrowLeft => HostKey::ArrowLeft,
        KeyCode::ArrowRight => HostKey::ArrowRight,
        KeyCode::ArrowUp => HostKey::ArrowUp,
        KeyCode::ArrowDown => HostKey::ArrowDown,
        KeyCode::PageUp => HostKey::PageUp,
        KeyCode::PageDown => HostKey::PageDown,
        KeyCode::Home => HostKey::Home,
        KeyCode::End => HostKey::End,
        KeyCode::Insert => HostKey::Insert,
        KeyCode::Delete => HostKey::Delete,
        KeyCode::Backspace => HostKey::Backspace,
        KeyCode::Space => HostKey::Spacebar,
        KeyCode::Enter => HostKey::Return,
        KeyCode::Escape => HostKey::Escape,

        KeyCode::ControlLeft | KeyCode::ControlRight => HostKey::Control,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => HostKey::Shift,
        KeyCode::AltLeft | KeyCode::AltRight => HostKey::Alt,
        KeyCode::SuperLeft => HostKey::LeftWindows,
        KeyCode::SuperRight => HostKey::RightWindows,
        KeyCode::ContextMenu => HostKey::LeftMenu,

        KeyCode::Digit0 => HostKey::Alpha0,
        KeyCode::Digit1 => HostKey::Alpha1,
        KeyCode::Digit2 => HostKey::Alpha2,
        KeyCode::Digit3 => HostKey::Alpha3,
        KeyCode::Digit4 => HostKey::Alpha4,
        KeyCode::Digit5 => HostKey::Alpha5,
        KeyCode::Digit6 => HostKey::Alpha6,
        KeyCode::Digit7 => HostKey::Alpha7,
        KeyCode::Digit8 => HostKey::Alpha8,
        KeyCode::Digit9 => HostKey::Alpha9,

        KeyCode::KeyA => HostKey::A,
        KeyCode::KeyB => HostKey::B,
        KeyCode::KeyC => HostKey::C,
        KeyCode::KeyD => HostKey::D,
        KeyCode::KeyE => HostKey::E,
        KeyCode::KeyF => HostKey::F,
        KeyCode::KeyG => HostKey::G,
        KeyCode::KeyH => HostKey::H,
        KeyCode::KeyI => HostKey::I,
        KeyCode::KeyJ => HostKey::J,
        KeyCode::KeyK => HostKey::K,
        KeyCode::KeyL => HostKey::L,
        KeyCode::KeyM => HostKey::M,
        KeyCode::KeyN => HostKey::N,
        KeyCode::KeyO => HostKey::O,
        KeyCode::KeyP => HostKey::P,
        KeyCode::KeyQ => HostKey::Q,
        KeyCode::KeyR => HostKey::R,
        KeyCode::KeyS => HostKey::S,
        KeyCode::KeyT => HostKey::T,
        KeyCode::KeyU => HostKey::U,
        KeyCode::KeyV => HostKey::V,
        KeyCode::KeyW => HostKey::W,
        KeyCode::KeyX => HostKey::X,
        KeyCode::KeyY => HostKey::Y,
        KeyCode::KeyZ => HostKey::Z,

        KeyCode::F1 => HostKey::F1,
        KeyCode::F2 => HostKey::F2,
        KeyCode::F3 => HostKey::F3,
        KeyCode::F4 => HostKey::F4,
        KeyCode::F5 => HostKey::F5,
        KeyCode::F6 => HostKey::F6,
        KeyCode::F7 => HostKey::F7,
        KeyCode::F8 => HostKey::F8,
        KeyCode::F9 => HostKey::F9,
        KeyCode::F10 => HostKey::F10,
        KeyCode::F11 => HostKey::F11,
        KeyCode::F12 => HostKey::F12,
        KeyCode::F13 => HostKey::F13,
        KeyCode::F14 => HostKey::F14,
        KeyCode::F15 => HostKey::F15,
        KeyCode::F16 => HostKey::F16,
        KeyCode::F17 => HostKey::F17,
        KeyCode::F18 => HostKey::F18,
        KeyCode::F19 => HostKey::F19,
        KeyCode::F20 => HostKey::F20,
        KeyCode::F21 => HostKey::F21,
        KeyCode::F22 => HostKey::F22,
        KeyCode::F23 => HostKey::F23,
        KeyCode::F24 => HostKey::F24,

        KeyCode::Quote => HostKey::Quote,
        KeyCode::Backquote => HostKey::BackQuote,
        KeyCode::Comma => HostKey::Comma,
        KeyCode::Minus => HostKey::Minus,
        KeyCode::Equal => HostKey::Equals,
        KeyCode::Period => HostKey::Period,
        KeyCode::Slash => HostKey::Slash,
        KeyCode::Semicolon => HostKey::Colon,
        KeyCode::BracketLeft => HostKey::LeftBracket,
        KeyCode::Backslash => HostKey::Backslash,
        KeyCode::BracketRight => HostKey::RightBracket,

        KeyCode::CapsLock => HostKey::Capital,
        KeyCode::ScrollLock => HostKey::Scroll,
        KeyCode::NumLock => HostKey::Numlock,
        KeyCode::PrintScreen => HostKey::PrintScreen,
        KeyCode::Pause => HostKey::Pause,

        KeyCode::Numpad0 => HostKey::Numpad0,
        KeyCode::Numpad1 => HostKey::Numpad1,
        KeyCode::Numpad2 => HostKey::Numpad2,
        KeyCode::Numpad3 => HostKey::Numpad3,
        KeyCode::Numpad4 => HostKey::Numpad4,
        KeyCode::Numpad5 => HostKey::Numpad5,
        KeyCode::Numpad6 => HostKey::Numpad6,
        KeyCode::Numpad7 => HostKey::Numpad7,
        KeyCode::Numpad8 => HostKey::Numpad8,
        KeyCode::Numpad9 => HostKey::Numpad9,
        KeyCode::NumpadDecimal => HostKey::NumpadDecimal,
        KeyCode::NumpadDivide => HostKey::NumpadDivide,
        KeyCode::NumpadMultiply => HostKey::NumpadMultiply,
        KeyCode::NumpadSubtract => HostKey::NumpadSubtract,
        KeyCode::NumpadAdd => HostKey::NumpadAdd,
        KeyCode::NumpadEnter => HostKey::NumpadEnter,

        KeyCode::BrowserBack => HostKey::BrowserBack,
        KeyCode::BrowserForward => HostKey::BrowserForward,
        KeyCode::IntlBackslash => HostKey::Oem102,

        _ => return None,
    };
    Some(key)
}
