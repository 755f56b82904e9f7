use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, NativeKeyCode, PhysicalKey};

use crate::input::{Action, InputEvent, Key, Modifiers, MouseButton};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// `modifiers` is the state last reported by `ModifiersChanged`; winit does
/// not attach it to key or button events. Returns `None` for events the
/// window hooks do not receive.
pub fn translate_window_event(
    scale_factor: f64,
    modifiers: Modifiers,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let action = match (event.state, event.repeat) {
                (ElementState::Pressed, false) => Action::Press,
                (ElementState::Pressed, true) => Action::Repeat,
                (ElementState::Released, _) => Action::Release,
            };
            let (key, scancode) = map_key(event.physical_key);
            Some(InputEvent::Key {
                key,
                scancode,
                action,
                modifiers,
            })
        }

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: map_mouse_button(*button),
            action: match state {
                ElementState::Pressed => Action::Press,
                ElementState::Released => Action::Release,
            },
            modifiers,
        }),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical(scale_factor, *position);
            Some(InputEvent::CursorMoved { x, y })
        }

        _ => None,
    }
}

fn to_logical(scale_factor: f64, pos: PhysicalPosition<f64>) -> (f64, f64) {
    let logical = pos.to_logical::<f64>(scale_factor);
    (logical.x, logical.y)
}

pub fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
    KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
    KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
    KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
    KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
    KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
    KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
];

/// Maps a physical key to `(Key, scancode)`.
///
/// The scancode is the platform's native code when winit could not identify
/// the key, and winit's stable `KeyCode` discriminant otherwise.
pub fn map_key(pk: PhysicalKey) -> (Key, u32) {
    let code = match pk {
        PhysicalKey::Code(code) => code,
        PhysicalKey::Unidentified(native) => {
            let raw = match native {
                NativeKeyCode::Android(c) | NativeKeyCode::Xkb(c) => c,
                NativeKeyCode::MacOS(c) | NativeKeyCode::Windows(c) => c as u32,
                NativeKeyCode::Unidentified => 0,
            };
            return (Key::Unknown(raw), raw);
        }
    };

    let key = match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,
        KeyCode::Delete => Key::Delete,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        other => {
            if let Some(i) = LETTERS.iter().position(|k| *k == other) {
                Key::Letter((b'A' + i as u8) as char)
            } else if let Some(i) = DIGITS.iter().position(|k| *k == other) {
                Key::Digit(i as u8)
            } else if let Some(i) = FUNCTION_KEYS.iter().position(|k| *k == other) {
                Key::F(i as u8 + 1)
            } else {
                Key::Unknown(other as u32)
            }
        }
    };

    (key, code as u32)
}
