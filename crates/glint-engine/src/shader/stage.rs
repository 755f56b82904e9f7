use std::fmt;

/// Role of a shader in the GL pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
    Compute,
}

impl ShaderStage {
    /// GL shader type enum passed to `glCreateShader`.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
            ShaderStage::TessEvaluation => glow::TESS_EVALUATION_SHADER,
            ShaderStage::Compute => glow::COMPUTE_SHADER,
        }
    }

    pub fn from_gl_enum(value: u32) -> Option<Self> {
        Some(match value {
            glow::VERTEX_SHADER => ShaderStage::Vertex,
            glow::FRAGMENT_SHADER => ShaderStage::Fragment,
            glow::GEOMETRY_SHADER => ShaderStage::Geometry,
            glow::TESS_CONTROL_SHADER => ShaderStage::TessControl,
            glow::TESS_EVALUATION_SHADER => ShaderStage::TessEvaluation,
            glow::COMPUTE_SHADER => ShaderStage::Compute,
            _ => return None,
        })
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
            ShaderStage::TessControl => "tessellation control",
            ShaderStage::TessEvaluation => "tessellation evaluation",
            ShaderStage::Compute => "compute",
        })
    }
}
