use std::collections::VecDeque;

use crate::device::Device;
use crate::share::ShareContent;

use super::window::{Window, WindowId};

/// Per-callback view of the window being driven.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub title: &'a str,
    /// Framebuffer size in physical pixels.
    pub size: (u32, u32),
    pub device: Device,
    pub share: &'a ShareContent,
    pub runtime: &'a mut RuntimeCtx,
}

impl WindowCtx<'_> {
    /// Width / height of the framebuffer; 1.0 while minimized.
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.size;
        if w == 0 || h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }
}

/// App commands queued from inside window callbacks.
///
/// Commands are buffered and applied, in order, after the current callback
/// returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: VecDeque<Command>,
}

pub(crate) enum Command {
    Attach {
        window: Box<dyn Window>,
        share_with: Option<WindowId>,
    },
    Close(WindowId),
    SetCurrent(WindowId),
    ShareContentWith {
        id: WindowId,
        other: WindowId,
    },
    Shutdown,
}

impl RuntimeCtx {
    /// Attaches `window`, optionally joining `share_with`'s GL share group
    /// and share content.
    pub fn attach_window(&mut self, window: impl Window + 'static, share_with: Option<WindowId>) {
        self.commands.push_back(Command::Attach {
            window: Box::new(window),
            share_with,
        });
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push_back(Command::Close(id));
    }

    pub fn set_current_window(&mut self, id: WindowId) {
        self.commands.push_back(Command::SetCurrent(id));
    }

    /// Makes `id` adopt `other`'s share content, releasing its own.
    pub fn share_content_with(&mut self, id: WindowId, other: WindowId) {
        self.commands.push_back(Command::ShareContentWith { id, other });
    }

    /// Terminates every window and stops the loop.
    pub fn shutdown(&mut self) {
        self.commands.push_back(Command::Shutdown);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn pop(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.commands.truncate(len);
    }

    pub(crate) fn clear(&mut self) {
        self.commands.clear();
    }
}
