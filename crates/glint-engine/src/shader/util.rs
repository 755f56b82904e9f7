//! Loading, compiling and diagnosing individual shader objects.

use std::fs;
use std::path::Path;

use glow::{Program, Shader};

use crate::device::{GlDevice, GlError};

use super::ShaderStage;

// Some drivers report failure with an empty log.
const EMPTY_LOG: &str = "no diagnostic reported by the driver";

/// Reads a shader source file as text.
pub fn load_ascii_from_file(path: impl AsRef<Path>) -> Result<String, GlError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| GlError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `path` and compiles it as a `stage` shader.
pub fn create_shader_from_file(
    device: &dyn GlDevice,
    path: impl AsRef<Path>,
    stage: ShaderStage,
) -> Result<Shader, GlError> {
    let path = path.as_ref();
    let source = load_ascii_from_file(path)?;
    create_shader_from_source(device, &source, &path.display().to_string(), stage)
}

/// Compiles `source` as a `stage` shader.
///
/// `origin` names the source in diagnostics (a path or a label). On failure
/// the shader object is deleted and the driver log is returned in the error.
pub fn create_shader_from_source(
    device: &dyn GlDevice,
    source: &str,
    origin: &str,
    stage: ShaderStage,
) -> Result<Shader, GlError> {
    let shader = device
        .create_shader(stage.gl_enum())
        .map_err(|reason| GlError::create("shader", reason))?;

    device.shader_source(shader, source);
    device.compile_shader(shader);

    match check_shader_error(device, shader) {
        None => {
            log::debug!("compiled {stage} shader `{origin}`");
            Ok(shader)
        }
        Some(log) => {
            device.delete_shader(shader);
            Err(GlError::Compile {
                stage,
                origin: origin.to_string(),
                log,
            })
        }
    }
}

/// Returns the compile log of `shader` if compilation failed.
pub fn check_shader_error(device: &dyn GlDevice, shader: Shader) -> Option<String> {
    if device.get_shader_compile_status(shader) {
        return None;
    }
    Some(non_empty(device.get_shader_info_log(shader)))
}

/// Returns the link log of `program` if linking failed.
pub fn check_program_error(device: &dyn GlDevice, program: Program) -> Option<String> {
    if device.get_program_link_status(program) {
        return None;
    }
    Some(non_empty(device.get_program_info_log(program)))
}

fn non_empty(log: String) -> String {
    let trimmed = log.trim_end();
    if trimmed.is_empty() {
        EMPTY_LOG.to_string()
    } else {
        trimmed.to_string()
    }
}
