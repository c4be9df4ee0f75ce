use crate::math::{centroid, look_rotation, midpoint, Point3, Rotation, Vector3};
use crate::skeleton::{joint, HandSkeleton};

/// Derived palm transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalmPose {
    pub position: Point3,
    pub orientation: Rotation,
}

/// Palm at the centroid of the wrist and the index and pinky knuckles,
/// facing from the wrist towards the knuckle midpoint.
///
/// The up reference points from the palm towards the centroid of the tracked
/// fingertips, so the rotation follows the splay of the hand. Returns `None`
/// until the three base joints have been tracked.
pub(crate) fn reconstruct_palm(skeleton: &HandSkeleton, offset: &Rotation) -> Option<PalmPose> {
    let tracked = |j: usize| {
        skeleton
            .part(j)
            .filter(|p| p.is_tracked())
            .map(|p| p.position)
    };
    let wrist = tracked(joint::WRIST)?;
    let index = tracked(joint::INDEX_MCP)?;
    let pinky = tracked(joint::PINKY_MCP)?;

    let position = centroid(&[wrist, index, pinky])?;
    let forward = midpoint(&index, &pinky) - wrist;
    let up = centroid(skeleton.tracked_fingertips()).map_or_else(Vector3::zeros, |c| c - position);

    Some(PalmPose {
        position,
        orientation: look_rotation(&forward, &up) * offset,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::euler_degrees;
    use crate::skeleton::FINGERTIPS;

    fn base(skeleton: &mut HandSkeleton) {
        let place = |s: &mut HandSkeleton, j: usize, at: Point3| {
            s.part_mut(j).unwrap().set_position(at);
        };
        place(skeleton, joint::WRIST, Point3::new(0.0, 0.0, 0.0));
        place(skeleton, joint::INDEX_MCP, Point3::new(1.0, 0.0, 2.0));
        place(skeleton, joint::PINKY_MCP, Point3::new(-1.0, 0.0, 2.0));
    }

    fn with_tips_at(y: f64) -> HandSkeleton {
        let mut skeleton = HandSkeleton::new();
        base(&mut skeleton);
        for tip in FINGERTIPS {
            skeleton
                .part_mut(tip)
                .unwrap()
                .set_position(Point3::new(0.0, y, 3.0));
        }
        skeleton
    }

    #[test]
    fn palm_sits_at_base_centroid() {
        let palm = reconstruct_palm(&with_tips_at(1.0), &Rotation::identity()).unwrap();
        assert_relative_eq!(palm.position, Point3::new(0.0, 0.0, 4.0 / 3.0), epsilon = 1e-12);
    }

    #[test]
    fn palm_faces_knuckles_with_fingers_up() {
        let palm = reconstruct_palm(&with_tips_at(1.0), &Rotation::identity()).unwrap();
        assert_relative_eq!(palm.orientation * Vector3::z(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(palm.orientation * Vector3::y(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn curled_fingers_flip_palm_up_axis() {
        let palm = reconstruct_palm(&with_tips_at(-1.0), &Rotation::identity()).unwrap();
        assert_relative_eq!(palm.orientation * Vector3::z(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(palm.orientation * Vector3::y(), -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn no_fingertips_still_yields_finite_rotation() {
        let mut skeleton = HandSkeleton::new();
        base(&mut skeleton);
        let palm = reconstruct_palm(&skeleton, &Rotation::identity()).unwrap();
        assert!(palm.orientation.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(palm.orientation * Vector3::z(), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn offset_is_composed_after_look_rotation() {
        let offset = euler_degrees([0.0, 90.0, 0.0]);
        let palm = reconstruct_palm(&with_tips_at(1.0), &offset).unwrap();
        assert_relative_eq!(palm.orientation * Vector3::z(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn untracked_base_yields_none() {
        assert!(reconstruct_palm(&HandSkeleton::new(), &Rotation::identity()).is_none());
    }
}
