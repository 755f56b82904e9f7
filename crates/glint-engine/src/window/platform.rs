use std::any::Any;

use anyhow::Result;

use crate::core::WindowConfig;
use crate::device::Device;

/// One native window together with its GL context.
pub trait Surface {
    /// GL function table of this surface's context.
    fn device(&self) -> Device;

    /// Makes this surface's context current on the calling thread.
    fn make_current(&self) -> Result<()>;

    fn swap_buffers(&self) -> Result<()>;

    /// Framebuffer size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the drawable after the native window changed size.
    fn resize(&self, width: u32, height: u32);

    fn scale_factor(&self) -> f64 {
        1.0
    }

    /// Native id for routing platform events; `None` for surfaces without a
    /// native window.
    fn native_id(&self) -> Option<winit::window::WindowId> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Creates surfaces. Implemented by the glutin backend and by headless
/// drivers.
pub trait Platform {
    /// Opens a window and creates its context. When `share_with` is given,
    /// the new context joins its GL share group.
    fn create_surface(
        &mut self,
        config: &WindowConfig,
        share_with: Option<&dyn Surface>,
    ) -> Result<Box<dyn Surface>>;
}
