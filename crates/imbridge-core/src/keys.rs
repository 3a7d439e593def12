//! Host device identifiers and their mapping onto the GUI library's keys
//!
//! The keyboard mapping is pure data: [`KEY_MAP`] lists every host key the
//! bridge forwards, paired with the GUI key it drives. Keys that need a
//! computed state (the unified super modifier) are handled by the input
//! translator on top of the table.

/// Mouse buttons the host reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Buttons forwarded every frame, in the GUI library's index order
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    /// Button index in the GUI library (0 = left, 1 = right, 2 = middle)
    pub fn gui_index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

/// Keyboard keys as identified by the host engine.
///
/// Modifiers are unified: the host reports a single `Control`, `Shift` and
/// `Alt` regardless of side, while the platform keys stay split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKey {
    Tab, ArrowLeft, ArrowRight, ArrowUp, ArrowDown,
    PageUp, PageDown, Home, End, Insert, Delete,
    Backspace, Spacebar, Return, Escape,
    Control, Shift, Alt, LeftWindows, RightWindows, LeftMenu,
    Alpha0, Alpha1, Alpha2, Alpha3, Alpha4, Alpha5, Alpha6, Alpha7, Alpha8, Alpha9,
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    F13, F14, F15, F16, F17, F18, F19, F20, F21, F22, F23, F24,
    Quote, BackQuote, Comma, Minus, Equals, Period, Slash, Colon,
    LeftBracket, Backslash, RightBracket,
    Capital, Scroll, Numlock, PrintScreen, Pause,
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadDecimal, NumpadDivide, NumpadMultiply, NumpadSubtract, NumpadAdd, NumpadEnter,
    BrowserBack, BrowserForward, Oem102,
}

/// Keys understood by the GUI library's input queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuiKey {
    Tab, LeftArrow, RightArrow, UpArrow, DownArrow,
    PageUp, PageDown, Home, End, Insert, Delete,
    Backspace, Space, Enter, Escape,
    LeftCtrl, LeftShift, LeftAlt, LeftSuper,
    RightCtrl, RightShift, RightAlt, RightSuper, Menu,
    Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    F13, F14, F15, F16, F17, F18, F19, F20, F21, F22, F23, F24,
    Apostrophe, Comma, Minus, Period, Slash, Semicolon, Equal,
    LeftBracket, Backslash, RightBracket, GraveAccent,
    CapsLock, ScrollLock, NumLock, PrintScreen, Pause,
    Keypad0, Keypad1, Keypad2, Keypad3, Keypad4,
    Keypad5, Keypad6, Keypad7, Keypad8, Keypad9,
    KeypadDecimal, KeypadDivide, KeypadMultiply, KeypadSubtract, KeypadAdd, KeypadEnter,
    AppBack, AppForward, Oem102,
    GamepadStart, GamepadBack,
    GamepadFaceLeft, GamepadFaceRight, GamepadFaceUp, GamepadFaceDown,
    GamepadDpadLeft, GamepadDpadRight, GamepadDpadUp, GamepadDpadDown,
    GamepadL1, GamepadR1, GamepadL2, GamepadR2, GamepadL3, GamepadR3,
    GamepadLStickLeft, GamepadLStickRight, GamepadLStickUp, GamepadLStickDown,
    GamepadRStickLeft, GamepadRStickRight, GamepadRStickUp, GamepadRStickDown,
    ModCtrl, ModShift, ModAlt, ModSuper,
}

/// Host keyboard key feeding each GUI key
pub static KEY_MAP: &[(GuiKey, HostKey)] = &[
    (GuiKey::Tab, HostKey::Tab),
    (GuiKey::LeftArrow, HostKey::ArrowLeft),
    (GuiKey::RightArrow, HostKey::ArrowRight),
    (GuiKey::UpArrow, HostKey::ArrowUp),
    (GuiKey::DownArrow, HostKey::ArrowDown),
    (GuiKey::PageUp, HostKey::PageUp),
    (GuiKey::PageDown, HostKey::PageDown),
    (GuiKey::Home, HostKey::Home),
    (GuiKey::End, HostKey::End),
    (GuiKey::Insert, HostKey::Insert),
    (GuiKey::Delete, HostKey::Delete),
    (GuiKey::Backspace, HostKey::Backspace),
    (GuiKey::Space, HostKey::Spacebar),
    (GuiKey::Enter, HostKey::Return),
    (GuiKey::Escape, HostKey::Escape),
    // The host does not distinguish sides for these three
    (GuiKey::LeftCtrl, HostKey::Control),
    (GuiKey::LeftShift, HostKey::Shift),
    (GuiKey::LeftAlt, HostKey::Alt),
    (GuiKey::LeftSuper, HostKey::LeftWindows),
    (GuiKey::RightCtrl, HostKey::Control),
    (GuiKey::RightShift, HostKey::Shift),
    (GuiKey::RightAlt, HostKey::Alt),
    (GuiKey::RightSuper, HostKey::RightWindows),
    (GuiKey::Menu, HostKey::LeftMenu),
    (GuiKey::Key0, HostKey::Alpha0),
    (GuiKey::Key1, HostKey::Alpha1),
    (GuiKey::Key2, HostKey::Alpha2),
    (GuiKey::Key3, HostKey::Alpha3),
    (GuiKey::Key4, HostKey::Alpha4),
    (GuiKey::Key5, HostKey::Alpha5),
    (GuiKey::Key6, HostKey::Alpha6),
    (GuiKey::Key7, HostKey::Alpha7),
    (GuiKey::Key8, HostKey::Alpha8),
    (GuiKey::Key9, HostKey::Alpha9),
    (GuiKey::A, HostKey::A),
    (GuiKey::B, HostKey::B),
    (GuiKey::C, HostKey::C),
    (GuiKey::D, HostKey::D),
    (GuiKey::E, HostKey::E),
    (GuiKey::F, HostKey::F),
    (GuiKey::G, HostKey::G),
    (GuiKey::H, HostKey::H),
    (GuiKey::I, HostKey::I),
    (GuiKey::J, HostKey::J),
    (GuiKey::K, HostKey::K),
    (GuiKey::L, HostKey::L),
    (GuiKey::M, HostKey::M),
    (GuiKey::N, HostKey::N),
    (GuiKey::O, HostKey::O),
    (GuiKey::P, HostKey::P),
    (GuiKey::Q, HostKey::Q),
    (GuiKey::R, HostKey::R),
    (GuiKey::S, HostKey::S),
    (GuiKey::T, HostKey::T),
    (GuiKey::U, HostKey::U),
    (GuiKey::V, HostKey::V),
    (GuiKey::W, HostKey::W),
    (GuiKey::X, HostKey::X),
    (GuiKey::Y, HostKey::Y),
    (GuiKey::Z, HostKey::Z),
    (GuiKey::F1, HostKey::F1),
    (GuiKey::F2, HostKey::F2),
    (GuiKey::F3, HostKey::F3),
    (GuiKey::F4, HostKey::F4),
    (GuiKey::F5, HostKey::F5),
    (GuiKey::F6, HostKey::F6),
    (GuiKey::F7, HostKey::F7),
    (GuiKey::F8, HostKey::F8),
    (GuiKey::F9, HostKey::F9),
    (GuiKey::F10, HostKey::F10),
    (GuiKey::F11, HostKey::F11),
    (GuiKey::F12, HostKey::F12),
    (GuiKey::F13, HostKey::F13),
    (GuiKey::F14, HostKey::F14),
    (GuiKey::F15, HostKey::F15),
    (GuiKey::F16, HostKey::F16),
    (GuiKey::F17, HostKey::F17),
    (GuiKey::F18, HostKey::F18),
    (GuiKey::F19, HostKey::F19),
    (GuiKey::F20, HostKey::F20),
    (GuiKey::F21, HostKey::F21),
    (GuiKey::F22, HostKey::F22),
    (GuiKey::F23, HostKey::F23),
    (GuiKey::F24, HostKey::F24),
    (GuiKey::Apostrophe, HostKey::Quote),
    (GuiKey::GraveAccent, HostKey::BackQuote),
    (GuiKey::Comma, HostKey::Comma),
    (GuiKey::Minus, HostKey::Minus),
    (GuiKey::Equal, HostKey::Equals),
    (GuiKey::Period, HostKey::Period),
    (GuiKey::Slash, HostKey::Slash),
    (GuiKey::Semicolon, HostKey::Colon),
    (GuiKey::LeftBracket, HostKey::LeftBracket),
    (GuiKey::Backslash, HostKey::Backslash),
    (GuiKey::RightBracket, HostKey::RightBracket),
    (GuiKey::CapsLock, HostKey::Capital),
    (GuiKey::ScrollLock, HostKey::Scroll),
    (GuiKey::NumLock, HostKey::Numlock),
    (GuiKey::PrintScreen, HostKey::PrintScreen),
    (GuiKey::Pause, HostKey::Pause),
    (GuiKey::Keypad0, HostKey::Numpad0),
    (GuiKey::Keypad1, HostKey::Numpad1),
    (GuiKey::Keypad2, HostKey::Numpad2),
    (GuiKey::Keypad3, HostKey::Numpad3),
    (GuiKey::Keypad4, HostKey::Numpad4),
    (GuiKey::Keypad5, HostKey::Numpad5),
    (GuiKey::Keypad6, HostKey::Numpad6),
    (GuiKey::Keypad7, HostKey::Numpad7),
    (GuiKey::Keypad8, HostKey::Numpad8),
    (GuiKey::Keypad9, HostKey::Numpad9),
    (GuiKey::KeypadDecimal, HostKey::NumpadDecimal),
    (GuiKey::KeypadDivide, HostKey::NumpadDivide),
    (GuiKey::KeypadMultiply, HostKey::NumpadMultiply),
    (GuiKey::KeypadSubtract, HostKey::NumpadSubtract),
    (GuiKey::KeypadAdd, HostKey::NumpadAdd),
    (GuiKey::KeypadEnter, HostKey::NumpadEnter),
    (GuiKey::AppBack, HostKey::BrowserBack),
    (GuiKey::AppForward, HostKey::BrowserForward),
    (GuiKey::Oem102, HostKey::Oem102),
    (GuiKey::ModCtrl, HostKey::Control),
    (GuiKey::ModShift, HostKey::Shift),
    (GuiKey::ModAlt, HostKey::Alt),
];

/// Whether the host key drives at least one GUI key
pub fn is_mapped(key: HostKey) -> bool {
    KEY_MAP.iter().any(|&(_, host)| host == key)
}

/// First GUI key driven by `key`
pub fn gui_key_for(key: HostKey) -> Option<GuiKey> {
    KEY_MAP
        .iter()
        .find(|&&(_, host)| host == key)
        .map(|&(gui, _)| gui)
}

/// Digital gamepad buttons the host reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    Start,
    Back,
    A,
    B,
    X,
    Y,
    DPadLeft,
    DPadRight,
    DPadUp,
    DPadDown,
    LeftShoulder,
    RightShoulder,
    LeftThumb,
    RightThumb,
}

/// Analog gamepad axes the host reports.
///
/// Sticks range over -1.0..=1.0 with +y pointing down; triggers range over
/// 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

/// Host gamepad button feeding each GUI gamepad key
pub static GAMEPAD_BUTTON_MAP: &[(GuiKey, GamepadButton)] = &[
    (GuiKey::GamepadStart, GamepadButton::Start),
    (GuiKey::GamepadBack, GamepadButton::Back),
    (GuiKey::GamepadFaceLeft, GamepadButton::X),
    (GuiKey::GamepadFaceRight, GamepadButton::B),
    (GuiKey::GamepadFaceUp, GamepadButton::Y),
    (GuiKey::GamepadFaceDown, GamepadButton::A),
    (GuiKey::GamepadDpadLeft, GamepadButton::DPadLeft),
    (GuiKey::GamepadDpadRight, GamepadButton::DPadRight),
    (GuiKey::GamepadDpadUp, GamepadButton::DPadUp),
    (GuiKey::GamepadDpadDown, GamepadButton::DPadDown),
    (GuiKey::GamepadL1, GamepadButton::LeftShoulder),
    (GuiKey::GamepadR1, GamepadButton::RightShoulder),
    (GuiKey::GamepadL3, GamepadButton::LeftThumb),
    (GuiKey::GamepadR3, GamepadButton::RightThumb),
];

/// How an analog axis is split into directional GUI keys
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinding {
    pub axis: GamepadAxis,
    /// Key fed by the positive half of the axis
    pub positive: GuiKey,
    /// Key fed by the negative half, `None` for one-sided triggers
    pub negative: Option<GuiKey>,
    pub is_trigger: bool,
}

/// Analog axis bindings, sticks first then triggers
pub static GAMEPAD_AXIS_MAP: &[AxisBinding] = &[
    AxisBinding {
        axis: GamepadAxis::LeftStickX,
        positive: GuiKey::GamepadLStickRight,
        negative: Some(GuiKey::GamepadLStickLeft),
        is_trigger: false,
    },
    AxisBinding {
        axis: GamepadAxis::LeftStickY,
        positive: GuiKey::GamepadLStickDown,
        negative: Some(GuiKey::GamepadLStickUp),
        is_trigger: false,
    },
    AxisBinding {
        axis: GamepadAxis::RightStickX,
        positive: GuiKey::GamepadRStickRight,
        negative: Some(GuiKey::GamepadRStickLeft),
        is_trigger: false,
    },
    AxisBinding {
        axis: GamepadAxis::RightStickY,
        positive: GuiKey::GamepadRStickDown,
        negative: Some(GuiKey::GamepadRStickUp),
        is_trigger: false,
    },
    AxisBinding {
        axis: GamepadAxis::LeftTrigger,
        positive: GuiKey::GamepadL2,
        negative: None,
        is_trigger: true,
    },
    AxisBinding {
        axis: GamepadAxis::RightTrigger,
        positive: GuiKey::GamepadR2,
        negative: None,
        is_trigger: true,
    },
];
