//! # particle-field
//!
//! One-shot generation of GPU-ready particle fields.
//!
//! A build takes a particle description and a viewport, and returns flat
//! position/size/color buffers ready for vertex upload, a velocity record per
//! particle for the caller's animation loop, the WGSL shading to draw them,
//! and the bounds particles were spawned in.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! let config = ParticleFieldConfig::new(2_000)
//!     .with_bounding_box(BoundingBox::Cube)
//!     .with_shape(ParticleShape::Circle)
//!     .with_size_range(2.0, 6.0);
//!
//! let field = ParticleFieldBuilder::new(config)
//!     .with_viewport(ViewportContext::new(Dimension::D3, 1280.0, 720.0).with_cube_radius(500.0))
//!     .with_direction(DirectionRange::uniform(-1.0, 1.0))
//!     .with_velocity_scale(0.5)
//!     .build(&mut RngSource::from_entropy())?;
//!
//! assert_eq!(field.buffers.positions.len(), 2_000 * 3);
//! ```
//!
//! ## Randomness
//!
//! Every random value comes from the [`RandomSource`] passed to `build`.
//! Use [`RngSource`] for real fields and [`SequenceSource`] to replay exact
//! values in tests.
//!
//! ## Colors
//!
//! Per-particle colors are hex tokens. Valid tokens are normalized to
//! two decimals (`#808080` becomes `0.5`); anything else becomes white.
//! Without explicit colors the color buffer stays zeroed, and the
//! [`ColorMode`] decides what the vertex stage draws.
//!
//! ## Drawing
//!
//! [`ParticleFieldGpu`] uploads a field with `wgpu` and records the instanced
//! draw. The update loop is yours: integrate `records[i].velocity`, keep
//! particles inside [`FieldBounds`], and push positions back with
//! [`ParticleFieldGpu::write_positions`].

pub mod bounds;
pub mod buffers;
mod builder;
pub mod color;
pub mod config;
mod error;
pub mod gpu;
pub mod random;
pub mod shaders;
mod shading;

pub use bounds::FieldBounds;
pub use buffers::{ParticleBuffers, ParticleRecord};
pub use builder::{build_field, ParticleField, ParticleFieldBuilder};
pub use config::{
    Axis, BoundingBox, CanvasSize, Dimension, DirectionRange, FieldDescription, ParticleFieldConfig,
    ViewportContext,
};
pub use error::{
    ConfigLoadError, ConfigurationError, FieldError, GpuError, ShapeAttribute, ShapeMismatchError,
};
pub use glam::{Vec2, Vec3};
pub use gpu::ParticleFieldGpu;
pub use random::{RandomSource, RngSource, SequenceSource};
pub use shaders::{ColorMode, ParticleShape};
pub use shading::{BlendMode, ShadingConfig};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::{build_field, ParticleField, ParticleFieldBuilder};
    pub use crate::config::{
        BoundingBox, Dimension, DirectionRange, FieldDescription, ParticleFieldConfig, ViewportContext,
    };
    pub use crate::error::FieldError;
    pub use crate::random::{RandomSource, RngSource, SequenceSource};
    pub use crate::shaders::{ColorMode, ParticleShape};
    pub use crate::{FieldBounds, ParticleBuffers, ParticleRecord, ShadingConfig};
    pub use crate::{Vec2, Vec3};
}
