use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::device::GlError;

/// Interleaved vertex layout uploaded by `RenderObject`.
///
/// Attribute locations: 0 = position, 1 = normal, 2 = tex_coord.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;

    /// `(location, components, byte offset)` for each attribute.
    pub const ATTRIBUTES: [(u32, i32, i32); 3] = [(0, 3, 0), (1, 3, 12), (2, 2, 24)];

    pub fn new(position: Vec3, normal: Vec3, tex_coord: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            ..Self::default()
        }
    }
}

/// CPU-side mesh description: vertices plus an index list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Two vertices joined by one line segment (draw with `Primitive::Lines`).
    pub fn line(start: Vec3, end: Vec3) -> Self {
        Self::new(vec![Vertex::at(start), Vertex::at(end)], vec![0, 1])
    }

    /// Flat `width` x `depth` plane in XZ, centred on the origin, facing +Y.
    pub fn plane(width: f32, depth: f32) -> Self {
        let (hw, hd) = (width * 0.5, depth * 0.5);
        let corners = [
            (Vec3::new(-hw, 0.0, -hd), [0.0, 0.0]),
            (Vec3::new(hw, 0.0, -hd), [1.0, 0.0]),
            (Vec3::new(hw, 0.0, hd), [1.0, 1.0]),
            (Vec3::new(-hw, 0.0, hd), [0.0, 1.0]),
        ];
        let vertices = corners
            .into_iter()
            .map(|(p, uv)| Vertex::new(p, Vec3::Y, uv))
            .collect();
        Self::new(vertices, vec![0, 2, 1, 0, 3, 2])
    }

    /// Axis-aligned cube with edge length `size`; four vertices per face so
    /// each face keeps its own normal. Triangles wind counter-clockwise seen
    /// from outside.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut geometry = Self::default();
        for (normal, u, v) in faces {
            let base = geometry.vertices.len() as u32;
            let centre = normal * h;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = centre + u * (su * h) + v * (sv * h);
                let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
                geometry.vertices.push(Vertex::new(position, normal, uv));
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        geometry
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Rejects index lists that reference missing vertices.
    pub fn validate(&self) -> Result<(), GlError> {
        let count = self.vertices.len();
        match self.indices.iter().find(|&&i| i as usize >= count) {
            Some(i) => Err(GlError::InvalidGeometry(format!(
                "index {i} out of range for {count} vertices"
            ))),
            None => Ok(()),
        }
    }

    pub(crate) fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub(crate) fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
