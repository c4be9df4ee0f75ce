pub mod joint;

pub use joint::{is_fingertip, CHILD, FINGERTIPS, JOINT_COUNT, PARENT, PINCH_FINGERTIPS};

use crate::math::{Point3, Rotation};

/// One reconstructed joint in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletalPart {
    /// World-space position.
    pub position: Point3,
    /// World-space orientation.
    pub orientation: Rotation,
    tracked: bool,
}

impl Default for SkeletalPart {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: Rotation::identity(),
            tracked: false,
        }
    }
}

impl SkeletalPart {
    /// Returns `true` once the part has received at least one position.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub(crate) fn set_position(&mut self, position: Point3) {
        self.position = position;
        self.tracked = true;
    }
}

/// The 21 skeletal parts of one hand, overwritten in place every frame.
#[derive(Debug, Clone, Default)]
pub struct HandSkeleton {
    parts: [SkeletalPart; JOINT_COUNT],
}

impl HandSkeleton {
    /// Creates a skeleton with every part untracked at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all parts in joint order.
    #[must_use]
    pub fn parts(&self) -> &[SkeletalPart; JOINT_COUNT] {
        &self.parts
    }

    /// Returns the part for `joint`, or `None` if out of range.
    #[must_use]
    pub fn part(&self, joint: usize) -> Option<&SkeletalPart> {
        self.parts.get(joint)
    }

    pub(crate) fn part_mut(&mut self, joint: usize) -> Option<&mut SkeletalPart> {
        self.parts.get_mut(joint)
    }

    /// World position of `joint`, or `None` if out of range.
    #[must_use]
    pub fn position(&self, joint: usize) -> Option<Point3> {
        self.parts.get(joint).map(|p| p.position)
    }

    /// Positions of fingertips that have been tracked at least once.
    pub fn tracked_fingertips(&self) -> impl Iterator<Item = &Point3> + '_ {
        FINGERTIPS
            .iter()
            .filter_map(|&j| self.parts.get(j))
            .filter(|p| p.tracked)
            .map(|p| &p.position)
    }

    /// Returns `true` if every part has been tracked at least once.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.parts.iter().all(|p| p.tracked)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_skeleton_is_untracked() {
        let skeleton = HandSkeleton::new();
        assert_eq!(skeleton.parts().len(), JOINT_COUNT);
        assert!(!skeleton.is_complete());
        assert_eq!(skeleton.tracked_fingertips().count(), 0);
    }

    #[test]
    fn out_of_range_part_is_none() {
        let skeleton = HandSkeleton::new();
        assert!(skeleton.part(JOINT_COUNT).is_none());
        assert!(skeleton.position(99).is_none());
    }

    #[test]
    fn tracked_fingertips_only_yields_updated_tips() {
        let mut skeleton = HandSkeleton::new();
        skeleton
            .part_mut(joint::INDEX_TIP)
            .unwrap()
            .set_position(Point3::new(1.0, 2.0, 3.0));
        let tips: Vec<_> = skeleton.tracked_fingertips().collect();
        assert_eq!(tips, vec![&Point3::new(1.0, 2.0, 3.0)]);
    }
}
