use super::{safe_normalize, Rotation, Vector3, TOLERANCE};

/// Builds the orientation whose local `+Z` axis points along `forward` and
/// whose local `+Y` axis is as close as possible to `up`.
///
/// A zero `forward` yields the identity. When `up` is zero or parallel to
/// `forward`, the first world axis (Y, Z, X) not parallel to it is used as the
/// up reference instead, so the result is always finite.
#[must_use]
pub fn look_rotation(forward: &Vector3, up: &Vector3) -> Rotation {
    let (dir, len) = safe_normalize(forward);
    if len < TOLERANCE {
        return Rotation::identity();
    }

    let up = if dir.cross(up).norm() < TOLERANCE {
        [Vector3::y(), Vector3::z(), Vector3::x()]
            .into_iter()
            .find(|axis| dir.cross(axis).norm() > 1e-3)
            .unwrap_or_else(Vector3::y)
    } else {
        *up
    };

    Rotation::face_towards(&dir, &up)
}

/// Rotation from Euler angles in degrees.
///
/// Applied about Z first, then X, then Y (all world axes).
#[must_use]
pub fn euler_degrees(angles: [f64; 3]) -> Rotation {
    let [x, y, z] = angles;
    let qx = Rotation::from_axis_angle(&Vector3::x_axis(), x.to_radians());
    let qy = Rotation::from_axis_angle(&Vector3::y_axis(), y.to_radians());
    let qz = Rotation::from_axis_angle(&Vector3::z_axis(), z.to_radians());
    qy * qx * qz
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn forward_axis_points_at_target() {
        let q = look_rotation(&Vector3::new(2.0, 0.0, 0.0), &Vector3::y());
        assert_relative_eq!(q * Vector3::z(), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(q * Vector3::y(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn zero_forward_is_identity() {
        let q = look_rotation(&Vector3::zeros(), &Vector3::y());
        assert_relative_eq!(q, Rotation::identity());
    }

    #[test]
    fn parallel_up_still_faces_forward() {
        let q = look_rotation(&Vector3::y(), &Vector3::y());
        assert!(q.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(q * Vector3::z(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn zero_up_falls_back_to_world_axis() {
        let q = look_rotation(&Vector3::x(), &Vector3::zeros());
        assert_relative_eq!(q * Vector3::z(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn euler_yaw_turns_forward_to_right() {
        let q = euler_degrees([0.0, 90.0, 0.0]);
        assert_relative_eq!(q * Vector3::z(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn euler_applies_z_then_x_then_y() {
        let q = euler_degrees([90.0, 90.0, 0.0]);
        let expected = Rotation::from_axis_angle(&Vector3::y_axis(), 90_f64.to_radians())
            * Rotation::from_axis_angle(&Vector3::x_axis(), 90_f64.to_radians());
        assert_relative_eq!(q, expected, epsilon = 1e-12);
    }

    #[test]
    fn zero_euler_is_identity() {
        assert_relative_eq!(euler_degrees([0.0; 3]), Rotation::identity());
    }
}
