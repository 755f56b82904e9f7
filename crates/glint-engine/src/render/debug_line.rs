use glam::{Mat4, Vec3};

use crate::device::{Device, GlError};
use crate::shader::{EffectHandle, ShaderStage};
use crate::share::ShareContent;

use super::{Geometry, Primitive, RenderObject};

/// Registry name of the effect shared by every `DebugLine`.
pub const DEBUG_LINE_EFFECT: &str = "debug_line";

const VERTEX_SRC: &str = include_str!("shaders/debug_line.vert");
const FRAGMENT_SRC: &str = include_str!("shaders/debug_line.frag");

/// A single colored line segment for debug overlays.
///
/// The two-vertex buffer is only re-uploaded when the endpoints change.
#[derive(Default)]
pub struct DebugLine {
    start: Vec3,
    end: Vec3,
    uploaded: bool,
    effect: Option<EffectHandle>,
    object: Option<RenderObject>,
}

impl DebugLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches (building on first use) the line effect from `share` and
    /// prepares an empty render object on `device`.
    ///
    /// `device` must belong to the window that draws the line: vertex arrays
    /// are not shared between contexts.
    pub fn init(&mut self, share: &ShareContent, device: Device) -> Result<(), GlError> {
        let effect = share.effect(DEBUG_LINE_EFFECT);
        {
            let mut e = effect.borrow_mut();
            if !e.is_linked() {
                e.delete_attached_shaders();
                e.attach_shader_source(VERTEX_SRC, "debug_line.vert", ShaderStage::Vertex)?;
                e.attach_shader_source(FRAGMENT_SRC, "debug_line.frag", ShaderStage::Fragment)?;
                e.link()?;
                log::debug!("built `{DEBUG_LINE_EFFECT}` effect");
            }
        }

        self.effect = Some(effect);
        self.object = Some(RenderObject::new(device));
        self.uploaded = false;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.effect.is_some()
    }

    /// Draws the segment `start..end` in `color` with the given camera.
    pub fn draw(
        &mut self,
        start: Vec3,
        end: Vec3,
        color: Vec3,
        view: &Mat4,
        proj: &Mat4,
    ) -> Result<(), GlError> {
        let (Some(effect), Some(object)) = (&self.effect, &mut self.object) else {
            return Err(GlError::NotInitialized("DebugLine"));
        };

        if !self.uploaded || start != self.start || end != self.end {
            object.set_geometry(&Geometry::line(start, end))?;
            self.start = start;
            self.end = end;
            self.uploaded = true;
        }

        let mut effect = effect.borrow_mut();
        effect.activate()?;
        effect.set_vec3("color", color);
        effect.set_matrix("view", view);
        effect.set_matrix("proj", proj);
        object.draw(Primitive::Lines);
        effect.deactivate()
    }
}
