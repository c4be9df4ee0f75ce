use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::{lerp_clamped, Point3};

/// World axis a [`MovementPlane`] is perpendicular to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAxis {
    X,
    Y,
    /// Upright plane spanning world X and Y.
    #[default]
    Z,
}

impl PlaneAxis {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// World axes the plane's `u` and `v` parameters run along.
    fn in_plane(self) -> (usize, usize) {
        match self {
            Self::X => (2, 1),
            Self::Y => (0, 2),
            Self::Z => (0, 1),
        }
    }

    fn name(index: usize) -> &'static str {
        ["x", "y", "z"][index]
    }
}

/// A bounded rectangle in world space that anchor and target positions are
/// confined to.
///
/// The two in-plane axes are bounded by `min`/`max`; the coordinate along the
/// normal axis is fixed at the centre of the bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementPlane {
    min: Point3,
    max: Point3,
    normal_axis: PlaneAxis,
}

impl MovementPlane {
    /// Creates a plane from the world-space bounds of the surface it covers.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is non-finite or `min` exceeds `max` on any
    /// axis.
    pub fn from_bounds(min: Point3, max: Point3, normal_axis: PlaneAxis) -> Result<Self> {
        if !min.iter().chain(max.iter()).all(|c| c.is_finite()) {
            return Err(GeometryError::NonFinite("plane bounds").into());
        }
        for axis in 0..3 {
            if min[axis] > max[axis] {
                return Err(GeometryError::InvalidBounds {
                    axis: PlaneAxis::name(axis),
                    min: min[axis],
                    max: max[axis],
                }
                .into());
            }
        }
        Ok(Self {
            min,
            max,
            normal_axis,
        })
    }

    /// Returns the minimum corner of the bounds.
    #[must_use]
    pub fn min(&self) -> &Point3 {
        &self.min
    }

    /// Returns the maximum corner of the bounds.
    #[must_use]
    pub fn max(&self) -> &Point3 {
        &self.max
    }

    /// Returns the axis the plane is perpendicular to.
    #[must_use]
    pub fn normal_axis(&self) -> PlaneAxis {
        self.normal_axis
    }

    /// Fixed world coordinate along the normal axis.
    #[must_use]
    pub fn fixed_coordinate(&self) -> f64 {
        let n = self.normal_axis.index();
        (self.min[n] + self.max[n]) * 0.5
    }

    /// Maps normalized `(u, v)` onto the plane rectangle.
    ///
    /// `u` runs from the minimum to the maximum bound of the first in-plane
    /// axis. `v` is inverted, so image-style coordinates with a top-left origin
    /// land with `v = 0` at the maximum bound. Both parameters are clamped to
    /// `[0, 1]`.
    #[must_use]
    pub fn project(&self, u: f64, v: f64) -> Point3 {
        let (ua, va) = self.normal_axis.in_plane();
        let n = self.normal_axis.index();

        let mut out = Point3::origin();
        out[ua] = lerp_clamped(self.min[ua], self.max[ua], u);
        out[va] = lerp_clamped(self.min[va], self.max[va], 1.0 - v);
        out[n] = self.fixed_coordinate();
        out
    }

    /// Returns `point` with its normal-axis coordinate moved onto the plane.
    #[must_use]
    pub fn snap(&self, point: &Point3) -> Point3 {
        let mut out = *point;
        out[self.normal_axis.index()] = self.fixed_coordinate();
        out
    }

    /// Returns the centre of the plane rectangle.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn upright() -> MovementPlane {
        MovementPlane::from_bounds(
            Point3::new(-4.0, 0.0, 2.0),
            Point3::new(4.0, 3.0, 2.0),
            PlaneAxis::Z,
        )
        .unwrap()
    }

    #[test]
    fn opposite_corners() {
        let plane = upright();
        assert_relative_eq!(plane.project(0.0, 0.0), Point3::new(-4.0, 3.0, 2.0));
        assert_relative_eq!(plane.project(1.0, 1.0), Point3::new(4.0, 0.0, 2.0));
    }

    #[test]
    fn centre_maps_to_centre() {
        let plane = upright();
        assert_relative_eq!(plane.project(0.5, 0.5), plane.center());
    }

    #[test]
    fn monotonic_per_axis() {
        let plane = upright();
        let mut last = plane.project(0.0, 0.0);
        for step in 1..=10 {
            let t = f64::from(step) / 10.0;
            let p = plane.project(t, t);
            assert!(p.x > last.x, "u must increase world x");
            assert!(p.y < last.y, "v must decrease world y");
            last = p;
        }
    }

    #[test]
    fn out_of_range_clamps_to_edges() {
        let plane = upright();
        assert_relative_eq!(plane.project(-5.0, 9.0), Point3::new(-4.0, 0.0, 2.0));
        assert_relative_eq!(plane.project(3.0, -1.0), Point3::new(4.0, 3.0, 2.0));
    }

    #[test]
    fn horizontal_plane_uses_x_and_z() {
        let plane = MovementPlane::from_bounds(
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(10.0, 1.0, 6.0),
            PlaneAxis::Y,
        )
        .unwrap();
        assert_relative_eq!(plane.project(0.25, 0.0), Point3::new(2.5, 1.0, 6.0));
        assert_relative_eq!(plane.fixed_coordinate(), 1.0);
    }

    #[test]
    fn snap_replaces_normal_coordinate_only() {
        let plane = upright();
        assert_relative_eq!(
            plane.snap(&Point3::new(7.0, -1.0, 9.0)),
            Point3::new(7.0, -1.0, 2.0)
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = MovementPlane::from_bounds(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
            PlaneAxis::Z,
        );
        assert!(result.is_err());
    }

    #[test]
    fn nan_bounds_are_rejected() {
        let result = MovementPlane::from_bounds(
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            PlaneAxis::Z,
        );
        assert!(result.is_err());
    }
}
