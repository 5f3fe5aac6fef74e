//! Shading configuration handed to the rendering backend.

use crate::config::ParticleFieldConfig;
use crate::shaders::{fragment_shader, vertex_shader};

/// Blend mode for particle rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Additive blending (default).
    ///
    /// Overlapping particles add up and glow brighter.
    #[default]
    Additive,

    /// Standard alpha blending.
    Alpha,
}

impl BlendMode {
    /// Convert to wgpu BlendState for the render pipeline.
    pub fn to_wgpu_blend_state(self) -> wgpu::BlendState {
        match self {
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        }
    }
}

/// Shader sources plus the fixed-function state needed to draw a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingConfig {
    /// WGSL vertex stage, entry point `vs_main`.
    pub vertex_shader: String,
    /// WGSL fragment stage, entry point `fs_main`.
    pub fragment_shader: String,
    pub blend_mode: BlendMode,
    /// True when transparency is below 1. Transparent fields do not write depth.
    pub transparent: bool,
    pub visible: bool,
}

impl ShadingConfig {
    /// Build the shading for `config` rendered at `device_pixel_ratio`.
    pub fn new(config: &ParticleFieldConfig, device_pixel_ratio: f32) -> Self {
        Self {
            vertex_shader: vertex_shader(config.color_mode, &config.color, device_pixel_ratio),
            fragment_shader: fragment_shader(config.shape, config.transparency),
            blend_mode: BlendMode::Additive,
            transparent: config.transparency < 1.0,
            visible: config.visible,
        }
    }

    /// Override the blend mode.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn blend_state(&self) -> wgpu::BlendState {
        self.blend_mode.to_wgpu_blend_state()
    }

    /// Whether the pipeline should write depth.
    pub fn depth_write_enabled(&self) -> bool {
        !self.transparent
    }
}
