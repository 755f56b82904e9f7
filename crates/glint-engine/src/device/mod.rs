//! GL device access.
//!
//! This module is responsible for:
//! - the `GlDevice` seam every GL-touching type goes through
//! - the glow-backed implementation used by real windows
//! - the error type shared by shader and buffer operations

mod api;
mod context;
mod error;

pub use api::{Device, GlDevice};
pub use context::GlContext;
pub use error::GlError;
