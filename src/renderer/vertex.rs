//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Model-space 2D vertex. Color comes from the `diffuse` uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub coord2d: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { coord2d: [x, y] }
    }

    pub fn x(&self) -> f32 {
        self.coord2d[0]
    }

    pub fn y(&self) -> f32 {
        self.coord2d[1]
    }

    /// Attribute list with `coord2d` at the location the shader declares
    pub fn attributes(location: u32) -> [wgpu::VertexAttribute; 1] {
        [wgpu::VertexAttribute {
            offset: 0,
            shader_location: location,
            format: wgpu::VertexFormat::Float32x2,
        }]
    }

    pub fn desc(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}
