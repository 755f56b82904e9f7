use glow::{Buffer, VertexArray};

use crate::device::{Device, GlError};

use super::{Geometry, Primitive, Vertex};

#[derive(Debug, Copy, Clone)]
struct Buffers {
    vao: VertexArray,
    vbo: Buffer,
    ebo: Buffer,
}

/// GPU copy of one mesh: vertex array + vertex buffer + index buffer.
///
/// Buffers are reallocated on every `set_geometry`; the index count stays 0
/// while no geometry is uploaded.
pub struct RenderObject {
    device: Device,
    buffers: Option<Buffers>,
    index_count: i32,
}

impl RenderObject {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            buffers: None,
            index_count: 0,
        }
    }

    /// Replaces the uploaded mesh with `geometry`.
    ///
    /// Empty geometry only clears. On error the object is left empty.
    pub fn set_geometry(&mut self, geometry: &Geometry) -> Result<(), GlError> {
        self.clear_geometry();
        if geometry.is_empty() {
            return Ok(());
        }
        geometry.validate()?;

        let buffers = self.allocate()?;
        let gl = &self.device;

        gl.bind_vertex_array(Some(buffers.vao));

        gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffers.vbo));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, geometry.vertex_bytes(), glow::STATIC_DRAW);

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffers.ebo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            geometry.index_bytes(),
            glow::STATIC_DRAW,
        );

        for (location, components, offset) in Vertex::ATTRIBUTES {
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_f32(location, components, Vertex::STRIDE, offset);
        }

        // Unbind the VAO first so it keeps its element buffer binding.
        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

        self.buffers = Some(buffers);
        self.index_count = geometry.indices.len() as i32;
        Ok(())
    }

    /// Releases the GPU buffers. Safe to call when already empty.
    pub fn clear_geometry(&mut self) {
        if let Some(b) = self.buffers.take() {
            self.device.delete_vertex_array(b.vao);
            self.device.delete_buffer(b.vbo);
            self.device.delete_buffer(b.ebo);
        }
        self.index_count = 0;
    }

    /// Issues one indexed draw call. Does nothing while empty.
    pub fn draw(&self, primitive: Primitive) {
        let Some(b) = self.buffers else { return };
        self.device.bind_vertex_array(Some(b.vao));
        self.device.draw_elements(primitive.gl_enum(), self.index_count);
        self.device.bind_vertex_array(None);
    }

    pub fn vao(&self) -> Option<VertexArray> {
        self.buffers.map(|b| b.vao)
    }

    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_none()
    }

    fn allocate(&self) -> Result<Buffers, GlError> {
        let gl = &self.device;
        let vao = gl
            .create_vertex_array()
            .map_err(|e| GlError::create("vertex array", e))?;
        let vbo = match gl.create_buffer() {
            Ok(b) => b,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(GlError::create("vertex buffer", e));
            }
        };
        let ebo = match gl.create_buffer() {
            Ok(b) => b,
            Err(e) => {
                gl.delete_buffer(vbo);
                gl.delete_vertex_array(vao);
                return Err(GlError::create("index buffer", e));
            }
        };
        Ok(Buffers { vao, vbo, ebo })
    }
}

impl Drop for RenderObject {
    fn drop(&mut self) {
        self.clear_geometry();
    }
}
