//! Glint engine crate.
//!
//! Small OpenGL demos on top of glutin/winit: windows with their own GL
//! contexts, shader effects, indexed meshes and debug lines.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
pub mod shader;
pub mod share;

#[cfg(test)]
mod testing;
