pub mod orientation;

pub use orientation::{euler_degrees, look_rotation};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// World-space orientation.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns the unit direction of `v` together with its length.
///
/// Vectors shorter than [`TOLERANCE`] yield the zero vector as direction
/// instead of a NaN, with their true length. Non-finite vectors yield zero
/// for both.
#[must_use]
pub fn safe_normalize(v: &Vector3) -> (Vector3, f64) {
    let len = v.norm();
    if !len.is_finite() {
        (Vector3::zeros(), 0.0)
    } else if len < TOLERANCE {
        (Vector3::zeros(), len)
    } else {
        (v / len, len)
    }
}

/// Linear interpolation from `a` to `b`, with `t` clamped to `[0, 1]`.
#[must_use]
pub fn lerp_clamped(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Arithmetic mean of a set of points, or `None` when the set is empty.
#[must_use]
pub fn centroid<'a, I>(points: I) -> Option<Point3>
where
    I: IntoIterator<Item = &'a Point3>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0_u32;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / f64::from(count)))
}
