//! GPU upload and drawing of a built particle field.
//!
//! [`ParticleFieldGpu`] owns the vertex buffers, uniform buffer and render
//! pipeline for one field. Buffers are created with `COPY_DST` so the caller's
//! update loop can rewrite positions every frame via [`ParticleFieldGpu::write_positions`].

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use wgpu::util::DeviceExt;

use crate::buffers::ParticleBuffers;
use crate::builder::ParticleField;
use crate::error::GpuError;

/// Vertices per particle quad.
const QUAD_VERTICES: u32 = 6;

/// Uniform block shared by the vertex stage.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Render target size in physical pixels.
    pub viewport: [f32; 2],
    pub _padding: [f32; 2],
}

impl ParticleUniforms {
    pub fn new(view_proj: Mat4, viewport: Vec2) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            viewport: viewport.to_array(),
            _padding: [0.0; 2],
        }
    }
}

impl Default for ParticleUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec2::ONE)
    }
}

/// Usage for particle vertex buffers: drawable and rewritable every frame.
pub const PARTICLE_BUFFER_USAGE: wgpu::BufferUsages =
    wgpu::BufferUsages::VERTEX.union(wgpu::BufferUsages::COPY_DST);

/// GPU resources for drawing a particle field.
pub struct ParticleFieldGpu {
    pub position_buffer: wgpu::Buffer,
    pub size_buffer: wgpu::Buffer,
    pub color_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    num_particles: u32,
    visible: bool,
}

impl ParticleFieldGpu {
    /// Upload `field` and build its render pipeline.
    ///
    /// `depth_format` must match the depth attachment of the pass the field is
    /// drawn into, if any. Transparent fields test against depth without
    /// writing it.
    pub fn new(
        device: &wgpu::Device,
        field: &ParticleField,
        target_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let buffers = &field.buffers;
        let shading = &field.shading;

        let position_buffer = create_vertex_buffer(device, "Particle Position Buffer", buffers.position_bytes());
        let size_buffer = create_vertex_buffer(device, "Particle Size Buffer", buffers.size_bytes());
        let color_buffer = create_vertex_buffer(device, "Particle Color Buffer", buffers.color_bytes());

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytemuck::bytes_of(&ParticleUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(shading.vertex_shader.as_str().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(shading.fragment_shader.as_str().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_layouts = ParticleBuffers::vertex_layouts();
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(shading.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: shading.depth_write_enabled(),
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!(
            "Uploaded particle field: {} particles, {} bytes of vertex data",
            field.count(),
            buffers.position_bytes().len() + buffers.size_bytes().len() + buffers.color_bytes().len()
        );

        Self {
            position_buffer,
            size_buffer,
            color_buffer,
            uniform_buffer,
            uniform_bind_group,
            pipeline,
            num_particles: field.count() as u32,
            visible: shading.visible,
        }
    }

    pub fn num_particles(&self) -> u32 {
        self.num_particles
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Overwrite particle positions, `x, y, z` per particle.
    pub fn write_positions(&self, queue: &wgpu::Queue, positions: &[f32]) {
        queue.write_buffer(&self.position_buffer, 0, bytemuck::cast_slice(positions));
    }

    /// Overwrite particle colors, `r, g, b` per particle.
    pub fn write_colors(&self, queue: &wgpu::Queue, colors: &[f32]) {
        queue.write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(colors));
    }

    /// Update the camera and render target size.
    pub fn update_uniforms(&self, queue: &wgpu::Queue, view_proj: Mat4, viewport: Vec2) {
        let uniforms = ParticleUniforms::new(view_proj, viewport);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Record the draw. Does nothing for invisible or empty fields.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if !self.visible || self.num_particles == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.size_buffer.slice(..));
        render_pass.set_vertex_buffer(2, self.color_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES, 0..self.num_particles);
    }
}

/// Zero-length buffers are not allowed, so empty fields get one padding word.
fn create_vertex_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    const EMPTY: [u8; 4] = [0; 4];
    let contents = if contents.is_empty() { &EMPTY[..] } else { contents };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: PARTICLE_BUFFER_USAGE,
    })
}

/// Request a device without a surface, for uploads and offscreen rendering.
pub async fn request_headless_device() -> Result<(wgpu::Device, wgpu::Queue), GpuError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuError::NoAdapter)?;

    log::info!("Using adapter: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Particle Field Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await?;

    Ok((device, queue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        // mat4x4 + vec2 + padding, 16-byte aligned
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 80);
    }

    #[test]
    fn test_uniforms_from_glam() {
        let uniforms = ParticleUniforms::new(Mat4::from_scale(glam::Vec3::splat(2.0)), Vec2::new(1920.0, 1080.0));
        assert_eq!(uniforms.view_proj[0][0], 2.0);
        assert_eq!(uniforms.view_proj[3][3], 1.0);
        assert_eq!(uniforms.viewport, [1920.0, 1080.0]);
    }

    #[test]
    fn test_buffer_usage_is_rewritable() {
        assert!(PARTICLE_BUFFER_USAGE.contains(wgpu::BufferUsages::VERTEX));
        assert!(PARTICLE_BUFFER_USAGE.contains(wgpu::BufferUsages::COPY_DST));
    }
}
