//! Input descriptors for building a particle field.
//!
//! Every type here is plain data with builder-style `with_*` helpers and serde
//! support, so a field can be described in code or loaded from JSON:
//!
//! ```ignore
//! let config = ParticleFieldConfig::new(500)
//!     .with_bounding_box(BoundingBox::Cube)
//!     .with_size_range(2.0, 6.0)
//!     .with_shape(ParticleShape::Star);
//!
//! let viewport = ViewportContext::new(Dimension::D3, 1280.0, 720.0).with_cube_radius(400.0);
//! ```
//!
//! JSON uses camelCase keys (`boundingBox`,
//! `colorMode`, `minSize`, `devicePixelRatio`, `xMin`, ...).

use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{
    ConfigLoadError, ConfigurationError, FieldError, ShapeAttribute, ShapeMismatchError,
};
use crate::shaders::{ColorMode, ParticleShape};

/// How the generation volume is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundingBox {
    /// Volume follows the canvas size (default).
    #[default]
    Canvas,
    /// Volume is a cube of edge `r` from the viewport.
    Cube,
}

/// Whether the field is flat or volumetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// Flat field, every particle has `z == 0`.
    #[serde(rename = "2D")]
    D2,
    /// Volumetric field (default).
    #[default]
    #[serde(rename = "3D")]
    D3,
}

impl Dimension {
    pub fn is_flat(self) -> bool {
        self == Dimension::D2
    }
}

/// A cartesian axis, used to report which direction range is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
            Axis::Z => f.write_str("z"),
        }
    }
}

/// Description of the particles to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleFieldConfig {
    /// Number of particles.
    pub count: usize,
    /// Explicit positions, one per particle. Copied verbatim when present.
    pub positions: Option<Vec<Vec3>>,
    /// Explicit hex colors (`#RRGGBB`, `#RGB`, ...), one per particle.
    pub colors: Option<Vec<String>>,
    /// How the generation volume is derived.
    pub bounding_box: BoundingBox,
    /// How the vertex stage colors particles.
    pub color_mode: ColorMode,
    /// Base hex color, used by [`ColorMode::Solid`].
    pub color: String,
    /// Sprite shape drawn by the fragment stage.
    pub shape: ParticleShape,
    /// Opacity multiplier, `0.0..=1.0`. Values below 1 enable blending.
    pub transparency: f32,
    /// Smallest sprite size in CSS pixels.
    pub min_size: f32,
    /// Largest sprite size in CSS pixels.
    pub max_size: f32,
    /// Whether the field is drawn at all.
    pub visible: bool,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            count: 100,
            positions: None,
            colors: None,
            bounding_box: BoundingBox::Canvas,
            color_mode: ColorMode::Solid,
            color: "#ffffff".to_string(),
            shape: ParticleShape::Circle,
            transparency: 0.5,
            min_size: 5.0,
            max_size: 10.0,
            visible: true,
        }
    }
}

impl ParticleFieldConfig {
    /// Create a configuration for `count` particles with default settings.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// Use explicit positions instead of random placement.
    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Assign an explicit hex color to each particle.
    pub fn with_colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    /// Set the base hex color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_shape(mut self, shape: ParticleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency;
        self
    }

    /// Set the range sizes are sampled from (inclusive).
    pub fn with_size_range(mut self, min_size: f32, max_size: f32) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Check scalar ranges and per-particle sequence lengths.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.min_size.is_finite() || !self.max_size.is_finite() || self.min_size > self.max_size {
            return Err(ConfigurationError::SizeRange {
                min: self.min_size,
                max: self.max_size,
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.transparency) {
            return Err(ConfigurationError::Transparency(self.transparency).into());
        }

        if let Some(positions) = &self.positions {
            check_len(ShapeAttribute::Positions, self.count, positions.len())?;
        }
        if let Some(colors) = &self.colors {
            check_len(ShapeAttribute::Colors, self.count, colors.len())?;
        }

        Ok(())
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        load_json(path.as_ref())
    }
}

fn check_len(attribute: ShapeAttribute, expected: usize, actual: usize) -> Result<(), ShapeMismatchError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ShapeMismatchError {
            attribute,
            expected,
            actual,
        })
    }
}

/// Per-axis bounds for the random velocity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionRange {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Default for DirectionRange {
    fn default() -> Self {
        Self::uniform(-1.0, 1.0)
    }
}

impl DirectionRange {
    pub fn new(x: (f32, f32), y: (f32, f32), z: (f32, f32)) -> Self {
        Self {
            x_min: x.0,
            x_max: x.1,
            y_min: y.0,
            y_max: y.1,
            z_min: z.0,
            z_max: z.1,
        }
    }

    /// Same `min..max` range on every axis.
    pub fn uniform(min: f32, max: f32) -> Self {
        Self::new((min, max), (min, max), (min, max))
    }

    /// `(axis, min, max)` for x, y and z, in that order.
    pub fn axes(&self) -> [(Axis, f32, f32); 3] {
        [
            (Axis::X, self.x_min, self.x_max),
            (Axis::Y, self.y_min, self.y_max),
            (Axis::Z, self.z_min, self.z_max),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (axis, min, max) in self.axes() {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ConfigurationError::DirectionRange { axis, min, max });
            }
        }
        Ok(())
    }
}

/// Canvas size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

/// Rendering context the field is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportContext {
    pub dimension: Dimension,
    pub device_pixel_ratio: f32,
    pub size: CanvasSize,
    /// Cube edge length, only read with [`BoundingBox::Cube`].
    pub r: f32,
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self {
            dimension: Dimension::D3,
            device_pixel_ratio: 1.0,
            size: CanvasSize {
                width: 800.0,
                height: 600.0,
            },
            r: 100.0,
        }
    }
}

impl ViewportContext {
    pub fn new(dimension: Dimension, width: f32, height: f32) -> Self {
        Self {
            dimension,
            size: CanvasSize { width, height },
            ..Default::default()
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn with_cube_radius(mut self, r: f32) -> Self {
        self.r = r;
        self
    }

    /// Check the context for the given bounding mode.
    ///
    /// The cube radius is ignored unless `bounding_box` is [`BoundingBox::Cube`].
    pub fn validate(&self, bounding_box: BoundingBox) -> Result<(), ConfigurationError> {
        if !positive(self.device_pixel_ratio) {
            return Err(ConfigurationError::DevicePixelRatio(self.device_pixel_ratio));
        }
        if !positive(self.size.width) || !positive(self.size.height) {
            return Err(ConfigurationError::CanvasSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        if bounding_box == BoundingBox::Cube && !positive(self.r) {
            return Err(ConfigurationError::CubeRadius(self.r));
        }
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Everything needed to build a field, as stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDescription {
    pub particles: ParticleFieldConfig,
    pub viewport: ViewportContext,
    pub direction: DirectionRange,
    /// Global velocity scale.
    pub velocity: f32,
}

impl Default for FieldDescription {
    fn default() -> Self {
        Self {
            particles: ParticleFieldConfig::default(),
            viewport: ViewportContext::default(),
            direction: DirectionRange::default(),
            velocity: 1.0,
        }
    }
}

impl FieldDescription {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        load_json(path.as_ref())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigLoadError> {
    let text = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&text)?;
    log::debug!("Loaded field configuration from {}", path.display());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_keys() {
        let json = r##"{
            "count": 4,
            "boundingBox": "cube",
            "colorMode": "rainbow",
            "color": "#ff00ff",
            "shape": "square",
            "transparency": 1.0,
            "minSize": 1,
            "maxSize": 3,
            "visible": false
        }"##;

        let config = ParticleFieldConfig::from_json_str(json).unwrap();
        assert_eq!(config.count, 4);
        assert_eq!(config.bounding_box, BoundingBox::Cube);
        assert_eq!(config.color_mode, ColorMode::Rainbow);
        assert_eq!(config.shape, ParticleShape::Square);
        assert_eq!(config.max_size, 3.0);
        assert!(!config.visible);
        assert!(config.positions.is_none());
    }

    #[test]
    fn test_negative_count_rejected_by_parser() {
        let result = ParticleFieldConfig::from_json_str(r#"{ "count": -1 }"#);
        assert!(matches!(result, Err(ConfigLoadError::Parse(_))));
    }

    #[test]
    fn test_dimension_spelling() {
        let viewport: ViewportContext =
            serde_json::from_str(r#"{ "dimension": "2D", "devicePixelRatio": 2.0 }"#).unwrap();
        assert_eq!(viewport.dimension, Dimension::D2);
        assert_eq!(viewport.device_pixel_ratio, 2.0);
        // Missing keys fall back to defaults
        assert_eq!(viewport.size.width, 800.0);
    }

    #[test]
    fn test_field_description_defaults() {
        let desc = FieldDescription::from_json_str(r#"{ "velocity": 0.25 }"#).unwrap();
        assert_eq!(desc.velocity, 0.25);
        assert_eq!(desc.direction, DirectionRange::uniform(-1.0, 1.0));
        assert_eq!(desc.particles.count, 100);
    }

    #[test]
    fn test_size_range_validation() {
        let config = ParticleFieldConfig::new(1).with_size_range(4.0, 2.0);
        assert_eq!(
            config.validate(),
            Err(FieldError::Configuration(ConfigurationError::SizeRange { min: 4.0, max: 2.0 }))
        );

        let nan = ParticleFieldConfig::new(1).with_size_range(f32::NAN, 2.0);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_transparency_validation() {
        assert!(ParticleFieldConfig::new(1).with_transparency(1.0).validate().is_ok());
        assert!(ParticleFieldConfig::new(1).with_transparency(0.0).validate().is_ok());
        assert!(ParticleFieldConfig::new(1).with_transparency(1.5).validate().is_err());
        assert!(ParticleFieldConfig::new(1).with_transparency(-0.1).validate().is_err());
    }

    #[test]
    fn test_shape_mismatch_validation() {
        let config = ParticleFieldConfig::new(2).with_positions(vec![Vec3::ZERO]);
        assert_eq!(
            config.validate(),
            Err(FieldError::ShapeMismatch(ShapeMismatchError {
                attribute: ShapeAttribute::Positions,
                expected: 2,
                actual: 1,
            }))
        );

        let config = ParticleFieldConfig::new(1).with_colors(["#fff", "#000"]);
        assert!(matches!(
            config.validate(),
            Err(FieldError::ShapeMismatch(ShapeMismatchError { attribute: ShapeAttribute::Colors, .. }))
        ));
    }

    #[test]
    fn test_direction_validation_reports_first_bad_axis() {
        let direction = DirectionRange::new((-1.0, 1.0), (0.0, 0.0), (3.0, -3.0));
        assert_eq!(
            direction.validate(),
            Err(ConfigurationError::DirectionRange { axis: Axis::Z, min: 3.0, max: -3.0 })
        );
    }

    #[test]
    fn test_cube_radius_only_checked_in_cube_mode() {
        let viewport = ViewportContext::new(Dimension::D3, 100.0, 100.0).with_cube_radius(0.0);
        assert!(viewport.validate(BoundingBox::Canvas).is_ok());
        assert_eq!(
            viewport.validate(BoundingBox::Cube),
            Err(ConfigurationError::CubeRadius(0.0))
        );
    }

    #[test]
    fn test_viewport_rejects_bad_pixel_ratio() {
        let viewport = ViewportContext::default().with_device_pixel_ratio(0.0);
        assert_eq!(
            viewport.validate(BoundingBox::Canvas),
            Err(ConfigurationError::DevicePixelRatio(0.0))
        );
    }
}
