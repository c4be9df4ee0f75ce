use crate::skeleton::JOINT_COUNT;

/// Why a part was not (fully) updated this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The frame carried no landmark for this joint.
    MissingLandmark,
    /// The landmark had a NaN or infinite coordinate.
    NonFinite,
    /// The joint it orients towards was not updated this frame.
    MissingChild,
    /// The joint and its child coincide, leaving no direction to face.
    DegenerateDirection,
}

/// Per-part result of one pose update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartOutcome {
    /// Position (and orientation, for non-fingertips) replaced.
    Updated,
    /// Position replaced, previous orientation kept.
    OrientationKept(SkipReason),
    /// Part left untouched.
    Skipped(SkipReason),
    /// No update was attempted.
    #[default]
    NotAttempted,
}

/// Aggregated result of one pose update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseReport {
    outcomes: [PartOutcome; JOINT_COUNT],
    hand_present: bool,
    extra_landmarks: usize,
}

impl Default for PoseReport {
    fn default() -> Self {
        Self::no_hand()
    }
}

impl PoseReport {
    /// Report for a frame without a detected hand.
    #[must_use]
    pub fn no_hand() -> Self {
        Self {
            outcomes: [PartOutcome::NotAttempted; JOINT_COUNT],
            hand_present: false,
            extra_landmarks: 0,
        }
    }

    pub(crate) fn with_hand() -> Self {
        Self {
            hand_present: true,
            ..Self::no_hand()
        }
    }

    pub(crate) fn set(&mut self, joint: usize, outcome: PartOutcome) {
        if let Some(slot) = self.outcomes.get_mut(joint) {
            *slot = outcome;
        }
    }

    pub(crate) fn set_extra_landmarks(&mut self, count: usize) {
        self.extra_landmarks = count;
    }

    /// Returns `true` if the frame carried a hand.
    #[must_use]
    pub fn hand_present(&self) -> bool {
        self.hand_present
    }

    /// Outcome for every joint, in joint order.
    #[must_use]
    pub fn outcomes(&self) -> &[PartOutcome; JOINT_COUNT] {
        &self.outcomes
    }

    /// Outcome for a single joint.
    #[must_use]
    pub fn outcome(&self, joint: usize) -> Option<PartOutcome> {
        self.outcomes.get(joint).copied()
    }

    /// Landmarks beyond the skeleton size that were ignored.
    #[must_use]
    pub fn extra_landmarks(&self) -> usize {
        self.extra_landmarks
    }

    /// Number of parts whose position was replaced.
    #[must_use]
    pub fn positioned(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PartOutcome::Updated | PartOutcome::OrientationKept(_)))
            .count()
    }

    /// Joints that were skipped or only partly updated, with the reason.
    pub fn problems(&self) -> impl Iterator<Item = (usize, SkipReason)> + '_ {
        self.outcomes.iter().enumerate().filter_map(|(j, o)| match o {
            PartOutcome::OrientationKept(r) | PartOutcome::Skipped(r) => Some((j, *r)),
            PartOutcome::Updated | PartOutcome::NotAttempted => None,
        })
    }

    /// Returns `true` if a hand was present and every part fully updated.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.hand_present && self.problems().next().is_none() && self.extra_landmarks == 0
    }
}
