//! Particle field construction.

use std::ops::Range;

use glam::Vec3;

use crate::bounds::FieldBounds;
use crate::buffers::{ParticleBuffers, ParticleRecord};
use crate::color::particle_color;
use crate::config::{DirectionRange, FieldDescription, ParticleFieldConfig, ViewportContext};
use crate::error::{ConfigurationError, FieldError};
use crate::random::RandomSource;
use crate::shading::ShadingConfig;

/// Everything produced by a build. Index `i` refers to the same particle in
/// the buffers and in `records`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    pub buffers: ParticleBuffers,
    pub records: Vec<ParticleRecord>,
    pub shading: ShadingConfig,
    pub bounds: FieldBounds,
}

impl ParticleField {
    /// Number of particles.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Instances to draw, `0..count`.
    pub fn draw_range(&self) -> Range<u32> {
        0..self.count() as u32
    }
}

/// A particle field builder.
///
/// Use method chaining to configure, then call `.build()` with a random source.
///
/// ```ignore
/// let field = ParticleFieldBuilder::new(ParticleFieldConfig::new(1_000))
///     .with_viewport(ViewportContext::new(Dimension::D2, 1280.0, 720.0))
///     .with_direction(DirectionRange::uniform(-0.5, 0.5))
///     .with_velocity_scale(2.0)
///     .build(&mut RngSource::from_entropy())?;
/// ```
#[derive(Debug, Clone)]
pub struct ParticleFieldBuilder {
    config: ParticleFieldConfig,
    viewport: ViewportContext,
    direction: DirectionRange,
    velocity_scale: f32,
}

impl ParticleFieldBuilder {
    /// Create a builder with the default viewport, direction range and a
    /// velocity scale of 1.
    pub fn new(config: ParticleFieldConfig) -> Self {
        Self {
            config,
            viewport: ViewportContext::default(),
            direction: DirectionRange::default(),
            velocity_scale: 1.0,
        }
    }

    /// Create a builder from a loaded description.
    pub fn from_description(description: FieldDescription) -> Self {
        Self {
            config: description.particles,
            viewport: description.viewport,
            direction: description.direction,
            velocity_scale: description.velocity,
        }
    }

    pub fn with_viewport(mut self, viewport: ViewportContext) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_direction(mut self, direction: DirectionRange) -> Self {
        self.direction = direction;
        self
    }

    /// Set the scalar every velocity multiplier is scaled by.
    pub fn with_velocity_scale(mut self, velocity_scale: f32) -> Self {
        self.velocity_scale = velocity_scale;
        self
    }

    pub fn config(&self) -> &ParticleFieldConfig {
        &self.config
    }

    /// Check every input without generating anything.
    pub fn validate(&self) -> Result<(), FieldError> {
        validate(&self.config, &self.viewport, &self.direction, self.velocity_scale)
    }

    /// Generate the field.
    pub fn build(&self, rng: &mut impl RandomSource) -> Result<ParticleField, FieldError> {
        build_field(&self.config, &self.viewport, &self.direction, self.velocity_scale, rng)
    }
}

fn validate(
    config: &ParticleFieldConfig,
    viewport: &ViewportContext,
    direction: &DirectionRange,
    velocity_scale: f32,
) -> Result<(), FieldError> {
    config.validate()?;
    viewport.validate(config.bounding_box)?;
    direction.validate()?;
    if !velocity_scale.is_finite() {
        return Err(ConfigurationError::VelocityScale(velocity_scale).into());
    }
    Ok(())
}

/// Generate a particle field.
///
/// All inputs are validated before anything is allocated. Random values are
/// drawn in a fixed order: every generated position (x, y, z per particle),
/// then size and velocity x, y, z per particle. Explicit positions skip the
/// position draws entirely.
pub fn build_field(
    config: &ParticleFieldConfig,
    viewport: &ViewportContext,
    direction: &DirectionRange,
    velocity_scale: f32,
    rng: &mut impl RandomSource,
) -> Result<ParticleField, FieldError> {
    validate(config, viewport, direction, velocity_scale)?;

    let count = config.count;
    let bounds = FieldBounds::compute(config.bounding_box, viewport);
    let mut buffers = ParticleBuffers::zeroed(count);

    match &config.positions {
        Some(positions) => {
            for (i, position) in positions.iter().enumerate() {
                buffers.set_position(i, *position);
            }
        }
        None => {
            for i in 0..count {
                buffers.set_position(i, bounds.sample(rng));
            }
        }
    }

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        buffers.sizes[i] = rng.range(config.min_size, config.max_size);

        let velocity = Vec3::new(
            rng.range(direction.x_min, direction.x_max),
            rng.range(direction.y_min, direction.y_max),
            rng.range(direction.z_min, direction.z_max),
        ) * velocity_scale;
        records.push(ParticleRecord::new(velocity));
    }

    if let Some(colors) = &config.colors {
        for (i, token) in colors.iter().enumerate() {
            buffers.set_color(i, particle_color(token));
        }
    }

    let shading = ShadingConfig::new(config, viewport.device_pixel_ratio);
    if !shading.visible {
        log::warn!("Particle field of {} particles is built invisible", count);
    }

    log::debug!(
        "Built particle field: {} particles, bounds {:?}, explicit positions: {}, explicit colors: {}",
        count,
        bounds,
        config.positions.is_some(),
        config.colors.is_some()
    );

    Ok(ParticleField {
        buffers,
        records,
        shading,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundingBox, Dimension};
    use crate::error::{ShapeAttribute, ShapeMismatchError};
    use crate::random::SequenceSource;

    fn cube_viewport(dimension: Dimension, r: f32) -> ViewportContext {
        ViewportContext::new(dimension, 640.0, 480.0).with_cube_radius(r)
    }

    #[test]
    fn test_exact_values_from_sequence() {
        let config = ParticleFieldConfig::new(1)
            .with_bounding_box(BoundingBox::Cube)
            .with_size_range(2.0, 4.0);
        let direction = DirectionRange::new((-1.0, 1.0), (0.0, 2.0), (-4.0, -2.0));
        // x, y, z, size, vx, vy, vz
        let mut rng = SequenceSource::new(vec![0.0, 0.5, 0.75, 0.5, 0.25, 0.5, 0.0]);

        let field =
            build_field(&config, &cube_viewport(Dimension::D3, 10.0), &direction, 2.0, &mut rng).unwrap();

        assert_eq!(field.buffers.positions, vec![-5.0, 0.0, 2.5]);
        assert_eq!(field.buffers.sizes, vec![3.0]);
        assert_eq!(field.records[0].velocity, Vec3::new(-1.0, 2.0, -8.0));
        assert_eq!(rng.draws(), 7);
    }

    #[test]
    fn test_explicit_positions_skip_position_draws() {
        let positions = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 5.5, -6.0)];
        let config = ParticleFieldConfig::new(2).with_positions(positions);
        let mut rng = SequenceSource::constant(0.5);

        let field = ParticleFieldBuilder::new(config).build(&mut rng).unwrap();

        assert_eq!(field.buffers.positions, vec![1.0, 2.0, 3.0, -4.0, 5.5, -6.0]);
        // size + 3 velocity draws per particle
        assert_eq!(rng.draws(), 8);
    }

    #[test]
    fn test_validation_happens_before_drawing() {
        let config = ParticleFieldConfig::new(3).with_colors(["#fff"]);
        let mut rng = SequenceSource::constant(0.5);

        let err = ParticleFieldBuilder::new(config).build(&mut rng).unwrap_err();

        assert_eq!(
            err,
            FieldError::ShapeMismatch(ShapeMismatchError {
                attribute: ShapeAttribute::Colors,
                expected: 3,
                actual: 1,
            })
        );
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_non_finite_velocity_scale_rejected() {
        let builder = ParticleFieldBuilder::new(ParticleFieldConfig::new(1)).with_velocity_scale(f32::INFINITY);
        assert_eq!(
            builder.validate(),
            Err(FieldError::Configuration(ConfigurationError::VelocityScale(f32::INFINITY)))
        );
    }

    #[test]
    fn test_flat_cube_has_zero_depth() {
        let config = ParticleFieldConfig::new(5).with_bounding_box(BoundingBox::Cube);
        let mut rng = SequenceSource::new(vec![0.1, 0.9, 0.3, 0.7]);

        let field = ParticleFieldBuilder::new(config)
            .with_viewport(cube_viewport(Dimension::D2, 8.0))
            .build(&mut rng)
            .unwrap();

        assert_eq!(field.bounds.z_bounds, 0.0);
        for i in 0..5 {
            assert_eq!(field.buffers.position(i).unwrap().z, 0.0);
        }
    }

    #[test]
    fn test_draw_range() {
        let mut rng = SequenceSource::constant(0.0);
        let field = ParticleFieldBuilder::new(ParticleFieldConfig::new(7)).build(&mut rng).unwrap();
        assert_eq!(field.draw_range(), 0..7);
        assert_eq!(field.count(), 7);
    }

    #[test]
    fn test_from_description() {
        let mut description = FieldDescription::default();
        description.particles.count = 2;
        description.velocity = 0.0;

        let mut rng = SequenceSource::constant(0.9);
        let field = ParticleFieldBuilder::from_description(description).build(&mut rng).unwrap();

        assert!(field.records.iter().all(|r| r.velocity == Vec3::ZERO));
    }
}
