use std::any::Any;
use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    PossiblyCurrentGlContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface as GlutinWindowSurface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::core::WindowConfig;
use crate::device::{Device, GlContext};

use super::platform::{Platform, Surface};

/// Context settings shared by every window the backend creates.
#[derive(Debug, Clone, Copy)]
pub struct ContextSettings {
    /// Requested core-profile OpenGL version.
    pub gl_version: (u8, u8),
    pub vsync: bool,
}

/// Long-lived glutin state.
///
/// The GL config chosen for the first window is reused for every later one;
/// contexts can only share objects when their configs are compatible.
pub(crate) struct GlutinBackend {
    settings: ContextSettings,
    gl_config: Option<Config>,
}

impl GlutinBackend {
    pub(crate) fn new(settings: ContextSettings) -> Self {
        Self {
            settings,
            gl_config: None,
        }
    }
}

/// `Platform` view of the backend for the duration of one event callback.
pub(crate) struct GlutinPlatform<'a> {
    event_loop: &'a ActiveEventLoop,
    backend: &'a mut GlutinBackend,
}

impl<'a> GlutinPlatform<'a> {
    pub(crate) fn new(event_loop: &'a ActiveEventLoop, backend: &'a mut GlutinBackend) -> Self {
        Self { event_loop, backend }
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<(Window, Config)> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

        if let Some(gl_config) = &self.backend.gl_config {
            let window = glutin_winit::finalize_window(self.event_loop, attrs, gl_config)
                .context("failed to create window")?;
            return Ok((window, gl_config.clone()));
        }

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(self.event_loop, template, pick_config)
            .map_err(|e| anyhow!("failed to create GL display: {e}"))?;
        let window = window.context("GL display created without a window")?;

        log::debug!(
            "GL config: {} samples, {:?}",
            gl_config.num_samples(),
            gl_config.api()
        );
        self.backend.gl_config = Some(gl_config.clone());
        Ok((window, gl_config))
    }
}

// glutin only calls the picker with at least one matching config.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
        .expect("no GL config matches the template")
}

impl Platform for GlutinPlatform<'_> {
    fn create_surface(
        &mut self,
        config: &WindowConfig,
        share_with: Option<&dyn Surface>,
    ) -> Result<Box<dyn Surface>> {
        let shared = match share_with {
            Some(s) => Some(
                s.as_any()
                    .downcast_ref::<GlutinSurface>()
                    .context("cannot share a GL context with a non-glutin surface")?,
            ),
            None => None,
        };

        let (window, gl_config) = self.create_window(config)?;
        let settings = self.backend.settings;
        let (major, minor) = settings.gl_version;

        let raw_handle = window.window_handle().ok().map(|h| h.as_raw());
        let mut attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))));
        if let Some(other) = shared {
            attrs = attrs.with_sharing(&other.context);
        }
        let attrs = attrs.build(raw_handle);

        let display = gl_config.display();
        let not_current = unsafe { display.create_context(&gl_config, &attrs) }
            .with_context(|| format!("failed to create OpenGL {major}.{minor} core context"))?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .context("failed to build surface attributes")?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .context("failed to create window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let interval = if settings.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("failed to set swap interval: {e}");
        }

        // The context was made current just above.
        let gl = unsafe { GlContext::from_loader(|name| display.get_proc_address(name)) };

        check_gl_version(&gl, settings.gl_version)?;

        Ok(Box::new(GlutinSurface {
            device: Rc::new(gl),
            context,
            surface,
            window,
        }))
    }
}

fn check_gl_version(gl: &GlContext, (major, minor): (u8, u8)) -> Result<()> {
    use glow::HasContext;

    let version = gl.raw().version();
    log::info!("OpenGL {}.{} ({})", version.major, version.minor, version.vendor_info);
    if (version.major, version.minor) < (major as u32, minor as u32) {
        bail!(
            "OpenGL {major}.{minor} required, driver provides {}.{}",
            version.major,
            version.minor
        );
    }
    Ok(())
}

/// A winit window with its current-able GL context.
///
/// Field order is drop order: context before surface before window.
pub(crate) struct GlutinSurface {
    device: Device,
    context: PossiblyCurrentContext,
    surface: GlutinWindowSurface<WindowSurface>,
    window: Window,
}

impl Surface for GlutinSurface {
    fn device(&self) -> Device {
        Rc::clone(&self.device)
    }

    fn make_current(&self) -> Result<()> {
        if self.context.is_current() {
            return Ok(());
        }
        self.context
            .make_current(&self.surface)
            .context("failed to make GL context current")
    }

    fn swap_buffers(&self) -> Result<()> {
        self.window.pre_present_notify();
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }

    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn resize(&self, width: u32, height: u32) {
        // Zero-sized (minimized) windows keep their previous drawable.
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn native_id(&self) -> Option<winit::window::WindowId> {
        Some(self.window.id())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
