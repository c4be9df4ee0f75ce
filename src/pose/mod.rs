//! Reconstruction of a world-space hand skeleton from per-frame landmarks.

mod movement;
mod palm;
mod report;

pub use movement::{MovementDelta, MovementTracker};
pub use palm::PalmPose;
pub use report::{PartOutcome, PoseReport, SkipReason};

use tracing::warn;

use crate::config::PoseConfig;
use crate::error::Result;
use crate::landmark::{HandFrame, Landmark};
use crate::math::{euler_degrees, look_rotation, Point3, Rotation, Vector3, TOLERANCE};
use crate::plane::MovementPlane;
use crate::skeleton::{HandSkeleton, CHILD, JOINT_COUNT};

/// Converts landmark lists into skeletal part transforms, a palm transform
/// and a plane-constrained anchor.
///
/// Parts are overwritten in place; a frame without a hand leaves every part
/// where it was.
#[derive(Debug, Clone)]
pub struct PoseReconstructor {
    config: PoseConfig,
    scale: Vector3,
    offset: Rotation,
    origin: Point3,
    skeleton: HandSkeleton,
    palm: Option<PalmPose>,
    anchor_landmark: Option<Landmark>,
    movement: MovementTracker,
    report: PoseReport,
}

impl PoseReconstructor {
    /// Creates a reconstructor with every part untracked.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PoseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scale: Vector3::from(config.scale),
            offset: euler_degrees(config.rotation_offset_deg),
            config,
            origin: Point3::origin(),
            skeleton: HandSkeleton::new(),
            palm: None,
            anchor_landmark: None,
            movement: MovementTracker::new(),
            report: PoseReport::no_hand(),
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &PoseConfig {
        &self.config
    }

    /// World position landmarks are placed relative to.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Moves the reference frame; takes effect on the next update.
    pub fn set_origin(&mut self, origin: Point3) {
        self.origin = origin;
    }

    /// Returns the reconstructed skeleton.
    #[must_use]
    pub fn skeleton(&self) -> &HandSkeleton {
        &self.skeleton
    }

    /// Returns the last computed palm transform, or `None` before the first
    /// successful [`compute_palm`](Self::compute_palm).
    #[must_use]
    pub fn palm(&self) -> Option<&PalmPose> {
        self.palm.as_ref()
    }

    /// Returns the report of the last update.
    #[must_use]
    pub fn last_report(&self) -> &PoseReport {
        &self.report
    }

    /// Returns the movement tracker.
    #[must_use]
    pub fn movement(&self) -> &MovementTracker {
        &self.movement
    }

    /// Returns `true` if movement tracking is enabled.
    #[must_use]
    pub fn movement_enabled(&self) -> bool {
        self.config.movement_enabled
    }

    /// Enables or disables movement tracking. Enabling re-arms the baseline.
    pub fn set_movement_enabled(&mut self, enabled: bool) {
        if enabled && !self.config.movement_enabled {
            self.movement.reset();
        }
        self.config.movement_enabled = enabled;
    }

    /// World position for a landmark: the origin offset by the negated,
    /// per-axis scaled landmark coordinates.
    #[must_use]
    pub fn landmark_to_world(&self, landmark: &Landmark) -> Point3 {
        self.origin + (-landmark.coords()).component_mul(&self.scale)
    }

    /// Updates the skeleton from the first hand in `frame`.
    ///
    /// A frame with no hands is skipped and the skeleton keeps its previous
    /// pose.
    pub fn update_frame(&mut self, frame: &HandFrame) -> &PoseReport {
        match frame.primary_hand() {
            Some(hand) => self.update_pose(hand),
            None => {
                self.report = PoseReport::no_hand();
                &self.report
            }
        }
    }

    /// Updates every skeletal part from one hand's landmarks.
    ///
    /// Each non-fingertip part is oriented to face the next joint outwards
    /// along its digit, composed with the configured rotation offset.
    /// Fingertip orientations are never touched. A part whose landmark is
    /// missing or non-finite is skipped without affecting the others; all
    /// skips are collected in the returned report and logged once.
    pub fn update_pose(&mut self, landmarks: &[Landmark]) -> &PoseReport {
        let mut report = PoseReport::with_hand();
        let mut fresh: [Option<Point3>; JOINT_COUNT] = [None; JOINT_COUNT];

        for (joint, slot) in fresh.iter_mut().enumerate() {
            match landmarks.get(joint) {
                None => report.set(joint, PartOutcome::Skipped(SkipReason::MissingLandmark)),
                Some(lm) if !lm.is_finite() => {
                    report.set(joint, PartOutcome::Skipped(SkipReason::NonFinite));
                }
                Some(lm) => {
                    let world = self.landmark_to_world(lm);
                    if let Some(part) = self.skeleton.part_mut(joint) {
                        part.set_position(world);
                        *slot = Some(world);
                        report.set(joint, PartOutcome::Updated);
                    }
                }
            }
        }
        report.set_extra_landmarks(landmarks.len().saturating_sub(JOINT_COUNT));

        for (joint, from) in fresh.iter().copied().enumerate() {
            let (Some(from), Some(child)) = (from, CHILD[joint]) else {
                continue;
            };
            let Some(to) = fresh[child] else {
                report.set(joint, PartOutcome::OrientationKept(SkipReason::MissingChild));
                continue;
            };
            let direction = to - from;
            if direction.norm() < TOLERANCE {
                report.set(
                    joint,
                    PartOutcome::OrientationKept(SkipReason::DegenerateDirection),
                );
                continue;
            }
            if let Some(part) = self.skeleton.part_mut(joint) {
                part.orientation = look_rotation(&direction, &Vector3::y()) * self.offset;
            }
        }

        if let Some(lm) = landmarks
            .get(self.config.anchor_landmark)
            .filter(|lm| lm.is_finite())
        {
            self.anchor_landmark = Some(*lm);
        }

        let problems = report.problems().count();
        if problems > 0 || report.extra_landmarks() > 0 {
            warn!(
                problems,
                extra = report.extra_landmarks(),
                first = ?report.problems().next(),
                "hand pose partially updated"
            );
        }

        self.report = report;
        &self.report
    }

    /// Maps a raw landmark onto the movement plane.
    ///
    /// The landmark is converted to the `[0, 1]` range, multiplied by the
    /// anchor gain and projected with [`MovementPlane::project`].
    #[must_use]
    pub fn compute_anchor(&self, raw: &Landmark, plane: &MovementPlane) -> Point3 {
        let unit = raw.to_unit_range(self.config.anchor_convention);
        let gain = self.config.anchor_gain;
        plane.project(unit.x * gain, unit.y * gain)
    }

    /// Recomputes the palm transform from the current skeleton.
    ///
    /// Returns `None` and keeps the previous palm while the wrist or base
    /// knuckles have never been tracked.
    pub fn compute_palm(&mut self) -> Option<PalmPose> {
        let palm = palm::reconstruct_palm(&self.skeleton, &self.offset)?;
        self.palm = Some(palm);
        Some(palm)
    }

    /// Movement of the anchor since the previous call.
    ///
    /// The first call after construction or re-enabling movement records the
    /// baseline and reports zero. Reports zero while no anchor landmark has
    /// been seen.
    pub fn compute_movement_delta(&mut self, plane: &MovementPlane) -> MovementDelta {
        let Some(raw) = self.anchor_landmark else {
            return MovementDelta::zero();
        };
        let anchor = self.compute_anchor(&raw, plane);
        self.movement.update(anchor)
    }
}
