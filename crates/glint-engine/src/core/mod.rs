//! Window contract and the app loop.
//!
//! `App` owns every window, drives the frame loop and routes input to the
//! current window. Windows talk back to the app through the `RuntimeCtx`
//! command buffer handed to every callback.

mod app;
mod ctx;
mod error;
mod window;

pub use app::{App, AppConfig, LoopFlow};
pub use ctx::{RuntimeCtx, WindowCtx};
pub use error::AttachError;
pub use window::{Window, WindowConfig, WindowId};
