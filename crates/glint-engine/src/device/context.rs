use std::cell::Cell;
use std::ffi::{c_void, CStr};

use glow::{Buffer, HasContext, Program, Shader, UniformLocation, VertexArray};

use super::GlDevice;

/// `GlDevice` backed by a loaded `glow::Context`.
///
/// The runtime makes the owning window's context current before any callback
/// that can reach this device, which is the precondition of every `unsafe`
/// block below. Handles passed in were produced by this context (or one in
/// its share group).
pub struct GlContext {
    gl: glow::Context,
    // Mirrors GL_CURRENT_PROGRAM without a driver round trip.
    bound_program: Cell<Option<Program>>,
}

impl GlContext {
    /// Loads GL entry points through `loader`.
    ///
    /// # Safety
    ///
    /// The context the loader belongs to must be current on this thread.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function_cstr(loader) };
        Self {
            gl,
            bound_program: Cell::new(None),
        }
    }

    /// Returns the underlying glow context for calls outside this trait.
    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }
}

impl GlDevice for GlContext {
    fn create_shader(&self, shader_type: u32) -> Result<Shader, String> {
        unsafe { self.gl.create_shader(shader_type) }
    }

    fn shader_source(&self, shader: Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn get_shader_compile_status(&self, shader: Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn get_shader_info_log(&self, shader: Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Program, shader: Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Program, shader: Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn get_program_link_status(&self, program: Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn get_program_info_log(&self, program: Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Program>) {
        unsafe { self.gl.use_program(program) }
        self.bound_program.set(program);
    }

    fn current_program(&self) -> Option<Program> {
        self.bound_program.get()
    }

    fn delete_program(&self, program: Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn get_uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_1_i32(&self, location: &UniformLocation, x: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), x) }
    }

    fn uniform_1_f32(&self, location: &UniformLocation, x: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), x) }
    }

    fn uniform_3_f32(&self, location: &UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { self.gl.uniform_3_f32(Some(location), x, y, z) }
    }

    fn uniform_matrix_4_f32_slice(&self, location: &UniformLocation, v: &[f32; 16]) {
        // Column-major input, as produced by glam.
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), false, v) }
    }

    fn create_vertex_array(&self) -> Result<VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn create_buffer(&self) -> Result<Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Buffer>) {
        unsafe { self.gl.bind_buffer(target, buffer) }
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn delete_buffer(&self, buffer: Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset)
        }
    }

    fn enable(&self, capability: u32) {
        unsafe { self.gl.enable(capability) }
    }

    fn disable(&self, capability: u32) {
        unsafe { self.gl.disable(capability) }
    }

    fn draw_elements(&self, mode: u32, count: i32) {
        unsafe { self.gl.draw_elements(mode, count, glow::UNSIGNED_INT, 0) }
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn viewport(&self, width: i32, height: i32) {
        unsafe { self.gl.viewport(0, 0, width, height) }
    }
}
