//! Time subsystem.
//!
//! The App owns one `FrameClock` and ticks it once per loop iteration; the
//! resulting `dt` is passed to every window's `on_tick`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
