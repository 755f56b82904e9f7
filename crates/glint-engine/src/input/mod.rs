//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform` translates native events into `InputEvent`s and the App routes
//! them to the current window's hooks.

pub mod platform;
mod types;

pub use types::{Action, InputEvent, Key, Modifiers, MouseButton};
