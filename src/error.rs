//! Error types for particle field construction.
//!
//! Malformed input is rejected before any buffer is allocated. Invalid color
//! tokens are not errors: they fall back to opaque white (see [`crate::color`]).

use std::fmt;

use crate::config::Axis;

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// `min_size` is greater than `max_size`, or either is not finite.
    SizeRange { min: f32, max: f32 },
    /// A direction axis has `min > max`, or a bound is not finite.
    DirectionRange { axis: Axis, min: f32, max: f32 },
    /// Transparency outside `0.0..=1.0`.
    Transparency(f32),
    /// The global velocity scale is not finite.
    VelocityScale(f32),
    /// Device pixel ratio must be finite and positive.
    DevicePixelRatio(f32),
    /// Canvas width and height must be finite and positive.
    CanvasSize { width: f32, height: f32 },
    /// Cube radius must be finite and positive when bounding by cube.
    CubeRadius(f32),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::SizeRange { min, max } => {
                write!(f, "Invalid particle size range: min {} must not exceed max {}", min, max)
            }
            ConfigurationError::DirectionRange { axis, min, max } => write!(
                f,
                "Invalid direction range on {} axis: min {} must not exceed max {}",
                axis, min, max
            ),
            ConfigurationError::Transparency(t) => {
                write!(f, "Transparency {} is outside the range 0.0..=1.0", t)
            }
            ConfigurationError::VelocityScale(v) => {
                write!(f, "Velocity scale {} is not a finite number", v)
            }
            ConfigurationError::DevicePixelRatio(r) => {
                write!(f, "Device pixel ratio {} must be a positive number", r)
            }
            ConfigurationError::CanvasSize { width, height } => write!(
                f,
                "Canvas size {}x{} must have positive width and height",
                width, height
            ),
            ConfigurationError::CubeRadius(r) => {
                write!(f, "Cube radius {} must be a positive number", r)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Which per-particle input sequence had the wrong length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeAttribute {
    Positions,
    Colors,
}

impl fmt::Display for ShapeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeAttribute::Positions => f.write_str("positions"),
            ShapeAttribute::Colors => f.write_str("colors"),
        }
    }
}

/// An explicit per-particle sequence whose length differs from `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatchError {
    pub attribute: ShapeAttribute,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for ShapeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expected {} {} (one per particle), got {}",
            self.expected, self.attribute, self.actual
        )
    }
}

impl std::error::Error for ShapeMismatchError {}

/// Errors returned by [`ParticleFieldBuilder::build`](crate::ParticleFieldBuilder::build).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A scalar input is out of range.
    Configuration(ConfigurationError),
    /// Explicit positions or colors do not match the particle count.
    ShapeMismatch(ShapeMismatchError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Configuration(e) => write!(f, "Configuration error: {}", e),
            FieldError::ShapeMismatch(e) => write!(f, "Shape mismatch: {}", e),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::Configuration(e) => Some(e),
            FieldError::ShapeMismatch(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for FieldError {
    fn from(e: ConfigurationError) -> Self {
        FieldError::Configuration(e)
    }
}

impl From<ShapeMismatchError> for FieldError {
    fn from(e: ShapeMismatchError) -> Self {
        FieldError::ShapeMismatch(e)
    }
}

/// Errors that can occur while loading a configuration file.
#[derive(Debug)]
pub enum ConfigLoadError {
    /// Failed to read file from disk.
    Io(std::io::Error),
    /// The file is not a valid configuration document.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadError::Io(e) => write!(f, "Failed to read configuration file: {}", e),
            ConfigLoadError::Parse(e) => write!(f, "Failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigLoadError::Io(e) => Some(e),
            ConfigLoadError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(e: std::io::Error) -> Self {
        ConfigLoadError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(e: serde_json::Error) -> Self {
        ConfigLoadError::Parse(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_field_error_source_chain() {
        let err: FieldError = ShapeMismatchError {
            attribute: ShapeAttribute::Colors,
            expected: 3,
            actual: 2,
        }
        .into();

        assert_eq!(err.to_string(), "Shape mismatch: Expected 3 colors (one per particle), got 2");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_direction_error_names_axis() {
        let err = ConfigurationError::DirectionRange { axis: Axis::Y, min: 2.0, max: 1.0 };
        assert!(err.to_string().contains("y axis"));
    }
}
