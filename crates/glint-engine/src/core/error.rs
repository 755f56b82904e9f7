use thiserror::Error;

use super::window::WindowId;

/// Why `App::attach_window` did not register a window.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("window {0} to share with is not attached")]
    UnknownShareWindow(WindowId),

    #[error("failed to create native window {id}: {reason:#}")]
    Platform { id: WindowId, reason: anyhow::Error },

    #[error("window {id} failed to initialize: {reason:#}")]
    Init { id: WindowId, reason: anyhow::Error },
}
