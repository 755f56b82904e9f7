use std::rc::Rc;

use glow::{Buffer, Program, Shader, UniformLocation, VertexArray};

/// Shared handle to the GL function table of one window.
///
/// Windows that share a GL context share the same handle, so objects created
/// through it remain valid in every window of the share group.
pub type Device = Rc<dyn GlDevice>;

/// The subset of OpenGL used by effects, render objects and debug drawing.
///
/// Signatures follow `glow::HasContext`, minus the `unsafe`: implementors
/// guarantee that their context is current on the calling thread whenever the
/// runtime hands them out.
pub trait GlDevice {
    // Shaders
    fn create_shader(&self, shader_type: u32) -> Result<Shader, String>;
    fn shader_source(&self, shader: Shader, source: &str);
    fn compile_shader(&self, shader: Shader);
    fn get_shader_compile_status(&self, shader: Shader) -> bool;
    fn get_shader_info_log(&self, shader: Shader) -> String;
    fn delete_shader(&self, shader: Shader);

    // Programs
    fn create_program(&self) -> Result<Program, String>;
    fn attach_shader(&self, program: Program, shader: Shader);
    fn detach_shader(&self, program: Program, shader: Shader);
    fn link_program(&self, program: Program);
    fn get_program_link_status(&self, program: Program) -> bool;
    fn get_program_info_log(&self, program: Program) -> String;
    fn use_program(&self, program: Option<Program>);
    /// Program last bound through `use_program` on this device.
    fn current_program(&self) -> Option<Program>;
    fn delete_program(&self, program: Program);

    // Uniforms
    fn get_uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation>;
    fn uniform_1_i32(&self, location: &UniformLocation, x: i32);
    fn uniform_1_f32(&self, location: &UniformLocation, x: f32);
    fn uniform_3_f32(&self, location: &UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_matrix_4_f32_slice(&self, location: &UniformLocation, v: &[f32; 16]);

    // Buffers and vertex arrays
    fn create_vertex_array(&self) -> Result<VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>);
    fn delete_vertex_array(&self, vertex_array: VertexArray);
    fn create_buffer(&self) -> Result<Buffer, String>;
    fn bind_buffer(&self, target: u32, buffer: Option<Buffer>);
    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32);
    fn delete_buffer(&self, buffer: Buffer);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);

    // Drawing
    fn enable(&self, capability: u32);
    fn disable(&self, capability: u32);
    fn draw_elements(&self, mode: u32, count: i32);
    fn clear(&self, color: [f32; 4]);
    fn viewport(&self, width: i32, height: i32);
}
