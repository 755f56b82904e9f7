//! Mesh upload and debug drawing.
//!
//! Convention:
//! - right-handed world space, +Y up
//! - matrices are column-major `glam::Mat4`, uploaded untransposed

mod debug_line;
mod geometry;
mod object;

pub use debug_line::{DebugLine, DEBUG_LINE_EFFECT};
pub use geometry::{Geometry, Vertex};
pub use object::RenderObject;

/// Primitive topology of an indexed draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    Triangles,
}

impl Primitive {
    pub fn gl_enum(self) -> u32 {
        match self {
            Primitive::Points => glow::POINTS,
            Primitive::Lines => glow::LINES,
            Primitive::LineStrip => glow::LINE_STRIP,
            Primitive::Triangles => glow::TRIANGLES,
        }
    }
}
