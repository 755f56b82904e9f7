//! Shader compilation and effects.
//!
//! `util` handles single shader objects (load, compile, diagnose). `Effect`
//! assembles them into a linked program with a best-effort uniform API.

mod effect;
mod stage;
pub mod util;

pub use effect::{Effect, EffectHandle};
pub use stage::ShaderStage;
