use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId as NativeWindowId;

use crate::core::{App, LoopFlow, Window};
use crate::input::platform::winit::{map_modifiers, translate_window_event};
use crate::input::Modifiers;

use super::backend::{GlutinBackend, GlutinPlatform};

/// Runs `app` on a winit event loop until it has no window left.
///
/// Returns the process exit code: 0 on a clean stop, 1 when `initial` could
/// not be attached.
pub(crate) fn run_event_loop(app: &mut App, initial: Box<dyn Window>) -> Result<i32> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runtime = Runtime {
        backend: GlutinBackend::new(app.context_settings()),
        app,
        initial: Some(initial),
        exit_code: 0,
        modifiers: Modifiers::default(),
    };

    event_loop
        .run_app(&mut runtime)
        .context("winit event loop terminated with error")?;

    Ok(runtime.exit_code)
}

/// Binds winit callbacks to one `App`.
struct Runtime<'a> {
    app: &'a mut App,
    backend: GlutinBackend,
    /// Window to attach once the loop is resumed.
    initial: Option<Box<dyn Window>>,
    exit_code: i32,
    /// winit reports modifiers separately from key and button events.
    modifiers: Modifiers,
}

impl ApplicationHandler for Runtime<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(initial) = self.initial.take() else {
            return;
        };

        let mut platform = GlutinPlatform::new(event_loop, &mut self.backend);
        match self.app.attach_window(&mut platform, initial, None) {
            Ok(_) => self.app.reset_clock(),
            Err(e) => {
                log::error!("failed to attach initial window: {e}");
                self.exit_code = 1;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        native_id: NativeWindowId,
        event: WindowEvent,
    ) {
        let Some(id) = self.app.window_by_native(native_id) else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                self.app.close_window(id);
            }

            WindowEvent::Resized(size) => self.app.resize_window(id, size.width, size.height),

            WindowEvent::Focused(true) => {
                self.app.set_current_window(id);
            }

            WindowEvent::ModifiersChanged(m) => self.modifiers = map_modifiers(m.state()),

            _ => {
                let scale_factor = self.app.scale_factor(id);
                if let Some(input) = translate_window_event(scale_factor, self.modifiers, &event) {
                    let mut platform = GlutinPlatform::new(event_loop, &mut self.backend);
                    self.app.dispatch_input(&mut platform, id, input);
                }
            }
        }

        if self.app.is_finished() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Nothing to drive until the initial window is up.
        if self.initial.is_some() {
            return;
        }

        let mut platform = GlutinPlatform::new(event_loop, &mut self.backend);
        if self.app.frame(&mut platform) == LoopFlow::Exit {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Contexts must go before the event loop does.
        self.app.shutdown();
    }
}
