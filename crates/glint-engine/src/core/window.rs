use std::fmt;

use anyhow::Result;

use crate::input::{Action, Key, Modifiers, MouseButton};

use super::ctx::WindowCtx;

/// App-assigned window identifier.
///
/// Ids start at 1, grow monotonically and are never reused within a run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Native window parameters requested at attach time.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Inner size in logical pixels.
    pub width: u32,
    pub height: u32,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("glint", 800, 600)
    }
}

/// Application window contract.
///
/// Lifecycle driven by [`App`](super::App):
/// attach (native window + GL context) -> `on_init` -> `on_tick` every frame
/// -> `on_terminate`. Every callback runs with this window's GL context
/// current.
pub trait Window {
    /// Native window parameters. Queried once, at attach time.
    fn config(&self) -> WindowConfig {
        WindowConfig::default()
    }

    /// One-time setup. An error aborts the attachment; `on_terminate` is not
    /// called for a window that never initialized.
    fn on_init(&mut self, ctx: &mut WindowCtx<'_>) -> Result<()>;

    /// Per-frame update and draw. An error terminates and removes this window
    /// without affecting its siblings.
    fn on_tick(&mut self, ctx: &mut WindowCtx<'_>, dt: f32) -> Result<()>;

    /// Teardown, called exactly once for every initialized window.
    fn on_terminate(&mut self, ctx: &mut WindowCtx<'_>);

    /// Keyboard event while this window is current.
    fn on_key(
        &mut self,
        ctx: &mut WindowCtx<'_>,
        key: Key,
        scancode: u32,
        action: Action,
        modifiers: Modifiers,
    ) {
        let _ = (ctx, key, scancode, action, modifiers);
    }

    /// Mouse button event while this window is current.
    fn on_mouse_button(
        &mut self,
        ctx: &mut WindowCtx<'_>,
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    ) {
        let _ = (ctx, button, action, modifiers);
    }

    /// Cursor movement (logical pixels) while this window is current.
    fn on_cursor_moved(&mut self, ctx: &mut WindowCtx<'_>, x: f64, y: f64) {
        let _ = (ctx, x, y);
    }
}
