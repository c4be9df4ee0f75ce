//! Landmark input: per-frame snapshots pulled from an upstream hand detector.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::math::Vector3;

/// One tracked skeletal point for one frame, in producer-normalized units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Coordinate range a landmark producer emits on the image axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkConvention {
    /// `x` and `y` in `[0, 1]`, origin at the top-left of the image.
    #[default]
    Unit,
    /// `x` and `y` in `[-1, 1]`, centred on the image.
    Signed,
}

impl Landmark {
    /// Creates a new landmark.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinates as a vector.
    #[must_use]
    pub fn coords(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Returns `true` if all three coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Re-expresses `x` and `y` in the `[0, 1]` range; `z` is passed through.
    #[must_use]
    pub fn to_unit_range(&self, convention: LandmarkConvention) -> Self {
        match convention {
            LandmarkConvention::Unit => *self,
            LandmarkConvention::Signed => Self {
                x: (self.x + 1.0) * 0.5,
                y: (self.y + 1.0) * 0.5,
                z: self.z,
            },
        }
    }
}

/// Immutable snapshot of one detector result.
///
/// Holds zero or more hands, each an ordered landmark list. Zero hands is a
/// valid "nothing detected" frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandFrame {
    sequence: u64,
    hands: Vec<Vec<Landmark>>,
}

impl HandFrame {
    /// Creates a frame holding the given hands.
    #[must_use]
    pub fn new(sequence: u64, hands: Vec<Vec<Landmark>>) -> Self {
        Self { sequence, hands }
    }

    /// Creates a frame with no detected hands.
    #[must_use]
    pub fn empty(sequence: u64) -> Self {
        Self {
            sequence,
            hands: Vec::new(),
        }
    }

    /// Producer-assigned frame counter.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// All detected hands, in producer order.
    #[must_use]
    pub fn hands(&self) -> &[Vec<Landmark>] {
        &self.hands
    }

    /// Landmarks of the first detected hand, if any.
    #[must_use]
    pub fn primary_hand(&self) -> Option<&[Landmark]> {
        self.hands.first().map(Vec::as_slice)
    }
}

/// Pull-based access to the most recent detector result.
pub trait LandmarkSource {
    /// Returns the latest available frame, or `None` if nothing has been
    /// produced yet.
    fn latest(&self) -> Option<Arc<HandFrame>>;
}

/// Single-slot mailbox a detector publishes into and a tracker pulls from.
///
/// Cloning yields another handle to the same slot.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    slot: Arc<Mutex<Option<Arc<HandFrame>>>>,
}

impl LatestFrame {
    /// Creates an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored frame.
    pub fn publish(&self, frame: HandFrame) {
        *self.slot.lock() = Some(Arc::new(frame));
    }

    /// Drops the stored frame.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}

impl LandmarkSource for LatestFrame {
    fn latest(&self) -> Option<Arc<HandFrame>> {
        self.slot.lock().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn signed_convention_maps_to_unit_range() {
        let lm = Landmark::new(-1.0, 1.0, 0.3).to_unit_range(LandmarkConvention::Signed);
        assert_relative_eq!(lm.x, 0.0);
        assert_relative_eq!(lm.y, 1.0);
        assert_relative_eq!(lm.z, 0.3);
    }

    #[test]
    fn unit_convention_is_unchanged() {
        let lm = Landmark::new(0.2, 0.7, -0.1);
        assert_eq!(lm.to_unit_range(LandmarkConvention::Unit), lm);
    }

    #[test]
    fn nan_landmark_is_not_finite() {
        assert!(!Landmark::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(Landmark::new(0.0, 0.0, 0.0).is_finite());
    }

    #[test]
    fn empty_frame_has_no_primary_hand() {
        assert!(HandFrame::empty(3).primary_hand().is_none());
    }

    #[test]
    fn mailbox_returns_latest_snapshot() {
        let mailbox = LatestFrame::new();
        assert!(mailbox.latest().is_none());

        let producer = mailbox.clone();
        producer.publish(HandFrame::empty(1));
        producer.publish(HandFrame::new(2, vec![vec![Landmark::default(); 21]]));

        let frame = mailbox.latest().unwrap();
        assert_eq!(frame.sequence(), 2);
        assert_eq!(frame.primary_hand().unwrap().len(), 21);

        mailbox.clear();
        assert!(producer.latest().is_none());
    }
}
