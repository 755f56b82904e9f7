//! Native windows and GL contexts.
//!
//! `Platform` and `Surface` are what the app loop sees; the glutin/winit
//! backend implements them for real displays and the runtime binds winit
//! callbacks to the app.

mod backend;
mod platform;
mod runtime;

pub use backend::ContextSettings;
pub use platform::{Platform, Surface};

pub(crate) use runtime::run_event_loop;
