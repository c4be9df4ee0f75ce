use crate::math::{safe_normalize, Point3, Vector3};

/// Anchor displacement between two consecutive ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementDelta {
    /// Unit direction of travel, or zero when the anchor did not move.
    pub direction: Vector3,
    /// Distance travelled.
    pub magnitude: f64,
}

impl MovementDelta {
    /// No movement.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            direction: Vector3::zeros(),
            magnitude: 0.0,
        }
    }
}

impl Default for MovementDelta {
    fn default() -> Self {
        Self::zero()
    }
}

/// Tracks the anchor between ticks.
///
/// The first sample after construction or [`reset`](Self::reset) only sets
/// the baseline.
#[derive(Debug, Clone, Default)]
pub struct MovementTracker {
    last_anchor: Option<Point3>,
    last_delta: MovementDelta,
}

impl MovementTracker {
    /// Creates a tracker with no baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the baseline; the next sample reports zero movement.
    pub fn reset(&mut self) {
        self.last_anchor = None;
        self.last_delta = MovementDelta::zero();
    }

    /// Feeds a new anchor and returns the movement since the previous one.
    pub fn update(&mut self, anchor: Point3) -> MovementDelta {
        let delta = match self.last_anchor {
            None => MovementDelta::zero(),
            Some(last) => {
                let (direction, magnitude) = safe_normalize(&(anchor - last));
                MovementDelta {
                    direction,
                    magnitude,
                }
            }
        };
        self.last_anchor = Some(anchor);
        self.last_delta = delta;
        delta
    }

    /// Anchor recorded on the last sample.
    #[must_use]
    pub fn last_anchor(&self) -> Option<Point3> {
        self.last_anchor
    }

    /// Movement reported on the last sample.
    #[must_use]
    pub fn last_delta(&self) -> MovementDelta {
        self.last_delta
    }

    /// Returns `true` once a baseline has been recorded.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.last_anchor.is_some()
    }
}
