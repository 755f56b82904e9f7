use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;

use crate::input::InputEvent;
use crate::share::ShareContent;
use crate::time::FrameClock;
use crate::window::{ContextSettings, Platform, Surface};

use super::ctx::{Command, RuntimeCtx, WindowCtx};
use super::error::AttachError;
use super::window::{Window, WindowId};

/// App-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Requested core-profile OpenGL version for every context.
    pub gl_version: (u8, u8),
    pub vsync: bool,
    /// Delta-time clamps applied by the frame clock.
    pub dt_min: Duration,
    pub dt_max: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gl_version: (3, 3),
            vsync: true,
            dt_min: FrameClock::DEFAULT_DT_MIN,
            dt_max: FrameClock::DEFAULT_DT_MAX,
        }
    }
}

/// Outcome of one loop iteration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopFlow {
    Continue,
    Exit,
}

// Field order is drop order: GL objects owned by the window and the share
// content go before the context that created them.
struct WindowSlot {
    title: String,
    window: Box<dyn Window>,
    share: ShareContent,
    surface: Box<dyn Surface>,
}

/// Window registry and frame loop.
///
/// Owns every attached window together with its native surface. Exactly one
/// window is current at a time; it receives input. Every live window is
/// ticked once per frame.
pub struct App {
    config: AppConfig,
    windows: BTreeMap<WindowId, WindowSlot>,
    current: Option<WindowId>,
    next_id: u32,
    shutdown_requested: bool,
    clock: FrameClock,
    delta_time: f32,
    runtime: RuntimeCtx,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let clock = FrameClock::with_clamps(config.dt_min, config.dt_max);
        Self {
            config,
            windows: BTreeMap::new(),
            current: None,
            next_id: 1,
            shutdown_requested: false,
            clock,
            delta_time: 0.0,
            runtime: RuntimeCtx::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates the native window and context for `window` and initializes it.
    ///
    /// With `share_with`, the new context joins that window's GL share group
    /// and the window starts out with its share content. A fresh id is spent
    /// even when attachment fails. On failure nothing is registered and
    /// `on_terminate` is not called.
    pub fn attach_window(
        &mut self,
        platform: &mut dyn Platform,
        window: Box<dyn Window>,
        share_with: Option<WindowId>,
    ) -> Result<WindowId, AttachError> {
        let id = WindowId(self.next_id);
        self.next_id += 1;

        let shared = match share_with {
            Some(other) => Some(
                self.windows
                    .get(&other)
                    .ok_or(AttachError::UnknownShareWindow(other))?,
            ),
            None => None,
        };

        let config = window.config();
        let surface = platform
            .create_surface(&config, shared.map(|s| s.surface.as_ref()))
            .and_then(|surface| surface.make_current().map(|()| surface))
            .map_err(|reason| AttachError::Platform { id, reason })?;

        let share = match shared {
            Some(slot) => slot.share.clone(),
            None => ShareContent::new(surface.device()),
        };

        let mut slot = WindowSlot {
            title: config.title,
            window,
            share,
            surface,
        };

        let queued = self.runtime.len();
        if let Err(reason) = with_window(id, &mut slot, &mut self.runtime, |w, ctx| w.on_init(ctx)) {
            // Commands from a window that never came up are discarded.
            self.runtime.truncate(queued);
            return Err(AttachError::Init { id, reason });
        }

        log::info!(
            "attached window {id} `{}` ({} live)",
            slot.title,
            self.windows.len() + 1
        );
        self.windows.insert(id, slot);
        self.current = Some(id);
        Ok(id)
    }

    /// Routes input to `id`. Returns `false` when `id` is not attached.
    pub fn set_current_window(&mut self, id: WindowId) -> bool {
        if !self.windows.contains_key(&id) {
            return false;
        }
        if self.current != Some(id) {
            log::debug!("current window: {id}");
            self.current = Some(id);
        }
        true
    }

    pub fn current_window(&self) -> Option<WindowId> {
        self.current
    }

    pub fn share_content(&self, id: WindowId) -> Option<&ShareContent> {
        self.windows.get(&id).map(|slot| &slot.share)
    }

    /// Makes `id` use `other`'s share content. The previous share content of
    /// `id` is released; its effects are destroyed if nobody else holds it.
    ///
    /// Only meaningful when both windows are in the same GL share group.
    pub fn share_content_with(&mut self, id: WindowId, other: WindowId) -> bool {
        let Some(share) = self.windows.get(&other).map(|slot| slot.share.clone()) else {
            return false;
        };
        let Some(slot) = self.windows.get_mut(&id) else {
            return false;
        };
        if slot.share.ptr_eq(&share) {
            return true;
        }

        if let Err(e) = slot.surface.make_current() {
            log::warn!("window {id}: releasing share content without a current context: {e:#}");
        }
        slot.share = share;
        log::debug!("window {id} now shares content with {other}");
        true
    }

    /// Terminates and removes `id`. Returns `false` when it is not attached.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        match self.windows.remove(&id) {
            Some(slot) => {
                self.terminate(id, slot);
                true
            }
            None => false,
        }
    }

    /// Runs one loop iteration: tick every window, drop the ones that
    /// failed, apply queued commands.
    ///
    /// Returns `Exit` once shutdown was requested or no window is left; all
    /// windows are terminated by then.
    pub fn frame(&mut self, platform: &mut dyn Platform) -> LoopFlow {
        if self.is_finished() {
            self.shutdown();
            return LoopFlow::Exit;
        }

        let time = self.clock.tick();
        self.delta_time = time.dt;

        // Windows attached during this frame are ticked from the next one.
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        let mut failed = Vec::new();
        for id in ids {
            let Some(slot) = self.windows.get_mut(&id) else {
                continue;
            };
            if let Err(e) = tick_window(id, slot, &mut self.runtime, time.dt) {
                log::error!("window {id} failed: {e:#}");
                failed.push(id);
            }
        }
        for id in failed {
            self.close_window(id);
        }

        self.apply_commands(platform);

        if self.is_finished() {
            self.shutdown();
            return LoopFlow::Exit;
        }
        LoopFlow::Continue
    }

    /// Delivers `event` from window `source`. Events from any window other
    /// than the current one are dropped.
    pub fn dispatch_input(&mut self, platform: &mut dyn Platform, source: WindowId, event: InputEvent) {
        if self.current != Some(source) {
            log::trace!("dropping input for non-current window {source}");
            return;
        }
        let Some(slot) = self.windows.get_mut(&source) else {
            return;
        };
        if let Err(e) = slot.surface.make_current() {
            log::warn!("window {source}: {e:#}");
            return;
        }

        with_window(source, slot, &mut self.runtime, |window, ctx| match event {
            InputEvent::Key {
                key,
                scancode,
                action,
                modifiers,
            } => window.on_key(ctx, key, scancode, action, modifiers),
            InputEvent::MouseButton {
                button,
                action,
                modifiers,
            } => window.on_mouse_button(ctx, button, action, modifiers),
            InputEvent::CursorMoved { x, y } => window.on_cursor_moved(ctx, x, y),
        });

        self.apply_commands(platform);
    }

    /// Terminates every window, newest first, and stops the loop.
    pub fn shutdown(&mut self) {
        self.shutdown_requested = true;
        if !self.windows.is_empty() {
            log::info!("shutting down {} window(s)", self.windows.len());
        }
        while let Some((id, slot)) = self.windows.pop_last() {
            self.terminate(id, slot);
        }
        self.runtime.clear();
        self.current = None;
    }

    /// Seconds between the last two frames, clamped.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Opens `initial` in a native window and runs the event loop until every
    /// window is closed or shutdown is requested.
    ///
    /// Returns 0 on a clean stop and 1 when `initial` could not be attached.
    pub fn run(&mut self, initial: impl Window + 'static) -> Result<i32> {
        self.shutdown_requested = false;
        crate::window::run_event_loop(self, Box::new(initial))
    }

    /// Same loop as [`run`](Self::run) on a caller-supplied platform, without
    /// native events.
    pub fn run_on(&mut self, platform: &mut dyn Platform, initial: Box<dyn Window>) -> i32 {
        self.shutdown_requested = false;
        if let Err(e) = self.attach_window(platform, initial, None) {
            log::error!("{e}");
            return 1;
        }

        self.reset_clock();
        while self.frame(platform) == LoopFlow::Continue {}
        0
    }

    pub(crate) fn context_settings(&self) -> ContextSettings {
        ContextSettings {
            gl_version: self.config.gl_version,
            vsync: self.config.vsync,
        }
    }

    pub(crate) fn window_by_native(&self, native: winit::window::WindowId) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|(_, slot)| slot.surface.native_id() == Some(native))
            .map(|(id, _)| *id)
    }

    pub(crate) fn resize_window(&mut self, id: WindowId, width: u32, height: u32) {
        if let Some(slot) = self.windows.get(&id) {
            slot.surface.resize(width, height);
        }
    }

    pub(crate) fn scale_factor(&self, id: WindowId) -> f64 {
        self.windows
            .get(&id)
            .map_or(1.0, |slot| slot.surface.scale_factor())
    }

    pub(crate) fn reset_clock(&mut self) {
        self.clock.reset();
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.shutdown_requested || self.windows.is_empty()
    }

    fn apply_commands(&mut self, platform: &mut dyn Platform) {
        while let Some(cmd) = self.runtime.pop() {
            match cmd {
                Command::Attach { window, share_with } => {
                    if let Err(e) = self.attach_window(platform, window, share_with) {
                        log::error!("{e}");
                    }
                }
                Command::Close(id) => {
                    if !self.close_window(id) {
                        log::debug!("close: window {id} is not attached");
                    }
                }
                Command::SetCurrent(id) => {
                    if !self.set_current_window(id) {
                        log::warn!("set current: window {id} is not attached");
                    }
                }
                Command::ShareContentWith { id, other } => {
                    if !self.share_content_with(id, other) {
                        log::warn!("share content: window {id} or {other} is not attached");
                    }
                }
                Command::Shutdown => self.shutdown(),
            }
        }
    }

    fn terminate(&mut self, id: WindowId, mut slot: WindowSlot) {
        if let Err(e) = slot.surface.make_current() {
            log::warn!("window {id}: terminating without a current context: {e:#}");
        }
        with_window(id, &mut slot, &mut self.runtime, |w, ctx| w.on_terminate(ctx));
        drop(slot);
        log::info!("closed window {id} ({} live)", self.windows.len());

        if self.current == Some(id) {
            self.current = self.windows.keys().next_back().copied();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if !self.windows.is_empty() {
            self.shutdown();
        }
    }
}

fn with_window<R>(
    id: WindowId,
    slot: &mut WindowSlot,
    runtime: &mut RuntimeCtx,
    f: impl FnOnce(&mut dyn Window, &mut WindowCtx<'_>) -> R,
) -> R {
    let WindowSlot {
        title,
        window,
        share,
        surface,
    } = slot;
    let mut ctx = WindowCtx {
        id,
        title,
        size: surface.size(),
        device: surface.device(),
        share,
        runtime,
    };
    f(window.as_mut(), &mut ctx)
}

fn tick_window(id: WindowId, slot: &mut WindowSlot, runtime: &mut RuntimeCtx, dt: f32) -> Result<()> {
    slot.surface.make_current()?;
    let (width, height) = slot.surface.size();
    slot.surface.device().viewport(width as i32, height as i32);
    with_window(id, slot, runtime, |window, ctx| window.on_tick(ctx, dt))?;
    slot.surface.swap_buffers()
}
