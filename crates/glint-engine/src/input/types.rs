/// Keyboard key identifier.
///
/// Covers the keys demos usually bind. Anything else arrives as
/// `Key::Unknown` carrying the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Delete,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    /// Letter key, always uppercase ASCII (`'A'..='Z'`).
    Letter(char),
    /// Top-row digit key, `0..=9`.
    Digit(u8),
    /// Function key, `1..=12`.
    F(u8),

    Unknown(u32),
}

/// Press/release transition, with key repeat reported separately.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys held when an event fired.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Platform-agnostic input event routed to the current window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        scancode: u32,
        action: Action,
        modifiers: Modifiers,
    },
    MouseButton {
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    },
    /// Cursor position in logical pixels, origin at the top-left corner.
    CursorMoved { x: f64, y: f64 },
}
