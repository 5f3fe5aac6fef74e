//! Flat, upload-ready particle buffers and per-particle records.
//!
//! Buffers are tightly packed `f32` arrays: particle `i` occupies
//! `positions[3i..3i + 3]`, `sizes[i]` and `colors[3i..3i + 3]`. The byte
//! views can be copied straight into GPU vertex buffers.

use glam::Vec3;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const SIZE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

/// Geometry for a particle field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleBuffers {
    /// `x, y, z` per particle.
    pub positions: Vec<f32>,
    /// One size per particle, in CSS pixels.
    pub sizes: Vec<f32>,
    /// `r, g, b` per particle, each in `[0, 1]`. All zeros unless colors were supplied.
    pub colors: Vec<f32>,
}

impl ParticleBuffers {
    /// Zero-filled buffers for `count` particles.
    pub fn zeroed(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            sizes: vec![0.0; count],
            colors: vec![0.0; count * 3],
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        read_vec3(&self.positions, index)
    }

    pub fn set_position(&mut self, index: usize, position: Vec3) {
        write_vec3(&mut self.positions, index, position);
    }

    pub fn size(&self, index: usize) -> Option<f32> {
        self.sizes.get(index).copied()
    }

    pub fn color(&self, index: usize) -> Option<Vec3> {
        read_vec3(&self.colors, index)
    }

    pub fn set_color(&mut self, index: usize, color: Vec3) {
        write_vec3(&mut self.colors, index, color);
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn size_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sizes)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Vertex buffer layouts for position, size and color, in that order.
    ///
    /// Each buffer advances once per instance; the vertex stage draws six
    /// vertices per particle.
    pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
        [
            wgpu::VertexBufferLayout {
                array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &SIZE_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &COLOR_ATTRIBUTES,
            },
        ]
    }
}

fn read_vec3(data: &[f32], index: usize) -> Option<Vec3> {
    data.get(index * 3..index * 3 + 3).map(Vec3::from_slice)
}

fn write_vec3(data: &mut [f32], index: usize, value: Vec3) {
    if let Some(slot) = data.get_mut(index * 3..index * 3 + 3) {
        value.write_to_slice(slot);
    }
}

/// Per-particle state kept on the CPU alongside the buffers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParticleRecord {
    /// Initial velocity.
    pub velocity: Vec3,
    /// Connection counter, always 0 after building.
    ///
    /// Reserved for the caller's update loop; nothing in this crate reads or
    /// writes it after initialization.
    pub connections: u32,
}

impl ParticleRecord {
    pub fn new(velocity: Vec3) -> Self {
        Self {
            velocity,
            connections: 0,
        }
    }
}
