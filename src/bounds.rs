//! Extents of the particle generation volume.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{BoundingBox, ViewportContext};
use crate::random::RandomSource;

/// Full extents of the centered generation volume.
///
/// Each axis spans `[-bound / 2, bound / 2)`. The caller's update loop should
/// wrap or bounce particles against the same extents so motion stays
/// consistent with where particles were spawned.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBounds {
    pub x_bounds: f32,
    pub y_bounds: f32,
    pub z_bounds: f32,
}

impl FieldBounds {
    /// Derive the volume from the bounding mode and viewport.
    ///
    /// Canvas mode stretches the y extent by 1.5 and uses the canvas width as
    /// depth when the field is 3D. A 2D field always has zero depth.
    pub fn compute(bounding_box: BoundingBox, viewport: &ViewportContext) -> Self {
        let flat = viewport.dimension.is_flat();
        match bounding_box {
            BoundingBox::Canvas => {
                let width = viewport.size.width;
                let height = viewport.size.height;
                Self {
                    x_bounds: width,
                    y_bounds: if flat { height } else { height * 1.5 },
                    z_bounds: if flat { 0.0 } else { width },
                }
            }
            BoundingBox::Cube => Self {
                x_bounds: viewport.r,
                y_bounds: viewport.r,
                z_bounds: if flat { 0.0 } else { viewport.r },
            },
        }
    }

    /// Extents as a vector.
    pub fn extents(&self) -> Vec3 {
        Vec3::new(self.x_bounds, self.y_bounds, self.z_bounds)
    }

    /// Half of each extent, i.e. the largest absolute coordinate.
    pub fn half_extents(&self) -> Vec3 {
        self.extents() * 0.5
    }

    /// Random point in the volume, one draw per axis in x, y, z order.
    ///
    /// The z draw happens even when the depth is zero so the number of draws
    /// per point does not depend on the dimension.
    pub fn sample(&self, rng: &mut impl RandomSource) -> Vec3 {
        let x = rng.next_f32() * self.x_bounds - self.x_bounds / 2.0;
        let y = rng.next_f32() * self.y_bounds - self.y_bounds / 2.0;
        let z = rng.next_f32() * self.z_bounds - self.z_bounds / 2.0;
        Vec3::new(x, y, z)
    }

    /// Whether `point` lies inside the half-open volume.
    ///
    /// Zero-extent axes accept only 0.
    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.half_extents();
        axis_contains(point.x, half.x) && axis_contains(point.y, half.y) && axis_contains(point.z, half.z)
    }
}

fn axis_contains(value: f32, half: f32) -> bool {
    if half == 0.0 {
        value == 0.0
    } else {
        value >= -half && value < half
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimension;
    use crate::random::{RngSource, SequenceSource};

    fn viewport(dimension: Dimension) -> ViewportContext {
        ViewportContext::new(dimension, 800.0, 600.0).with_cube_radius(10.0)
    }

    #[test]
    fn test_canvas_bounds() {
        let flat = FieldBounds::compute(BoundingBox::Canvas, &viewport(Dimension::D2));
        assert_eq!(flat, FieldBounds { x_bounds: 800.0, y_bounds: 600.0, z_bounds: 0.0 });

        let deep = FieldBounds::compute(BoundingBox::Canvas, &viewport(Dimension::D3));
        assert_eq!(deep, FieldBounds { x_bounds: 800.0, y_bounds: 900.0, z_bounds: 800.0 });
    }

    #[test]
    fn test_cube_bounds() {
        let flat = FieldBounds::compute(BoundingBox::Cube, &viewport(Dimension::D2));
        assert_eq!(flat, FieldBounds { x_bounds: 10.0, y_bounds: 10.0, z_bounds: 0.0 });

        let deep = FieldBounds::compute(BoundingBox::Cube, &viewport(Dimension::D3));
        assert_eq!(deep, FieldBounds { x_bounds: 10.0, y_bounds: 10.0, z_bounds: 10.0 });
    }

    #[test]
    fn test_sample_extremes() {
        let bounds = FieldBounds { x_bounds: 10.0, y_bounds: 4.0, z_bounds: 0.0 };

        let mut low = SequenceSource::constant(0.0);
        assert_eq!(bounds.sample(&mut low), Vec3::new(-5.0, -2.0, 0.0));
        assert_eq!(low.draws(), 3);

        let mut mid = SequenceSource::constant(0.5);
        assert_eq!(bounds.sample(&mut mid), Vec3::ZERO);
    }

    #[test]
    fn test_samples_stay_inside() {
        let bounds = FieldBounds::compute(BoundingBox::Canvas, &viewport(Dimension::D3));
        let mut rng = RngSource::seeded(3);
        for _ in 0..500 {
            assert!(bounds.contains(bounds.sample(&mut rng)));
        }
    }

    #[test]
    fn test_flat_samples_have_zero_depth() {
        let bounds = FieldBounds::compute(BoundingBox::Cube, &viewport(Dimension::D2));
        let mut rng = RngSource::seeded(11);
        for _ in 0..100 {
            assert_eq!(bounds.sample(&mut rng).z, 0.0);
        }
    }
}
