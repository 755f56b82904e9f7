use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// Errors reported by shader, effect and render object operations.
///
/// None of these are retried: a failed compile, link or upload is terminal
/// for the resource that produced it.
#[derive(Debug, Error)]
pub enum GlError {
    /// A shader source file could not be opened or read.
    #[error("failed to read shader source `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A shader stage failed to compile.
    #[error("{stage} shader `{origin}` failed to compile:\n{log}")]
    Compile {
        stage: ShaderStage,
        /// File path or label of the source.
        origin: String,
        /// Driver info log.
        log: String,
    },

    /// A program failed to link.
    #[error("program failed to link:\n{log}")]
    Link { log: String },

    /// The driver refused to create an object.
    #[error("failed to create {object}: {reason}")]
    Create { object: &'static str, reason: String },

    #[error("effect is not linked")]
    NotLinked,

    /// Shaders cannot be added to a program that is already linked.
    #[error("effect is already linked")]
    AlreadyLinked,

    #[error("a {0} shader is already attached")]
    DuplicateStage(ShaderStage),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("{0} used before init")]
    NotInitialized(&'static str),
}

impl GlError {
    pub(crate) fn create(object: &'static str, reason: String) -> Self {
        Self::Create { object, reason }
    }
}
