//! Per-tick driver tying a landmark source, the pose reconstructor and a
//! grab controller together.

use std::fmt;

use tracing::warn;

use crate::config::TrackerConfig;
use crate::error::{HandGrabError, Result, TrackerError};
use crate::grab::{ControllerId, GrabController, GrabTransition, GrabWorld};
use crate::landmark::{HandFrame, LandmarkSource};
use crate::math::Point3;
use crate::plane::MovementPlane;
use crate::pose::{MovementDelta, PoseReconstructor, PoseReport};
use crate::skeleton::HandSkeleton;

const SOURCE: &str = "landmark source";
const PLANE: &str = "movement plane";

/// One tracked hand driving one grab controller.
///
/// Each tick runs [`tick_pose`](Self::tick_pose) and then
/// [`tick_grab`](Self::tick_grab), so grab evaluation always sees the pose
/// of the current frame. Missing collaborators short-circuit the tick and
/// are logged once until supplied again.
pub struct HandTracker {
    source: Option<Box<dyn LandmarkSource + Send>>,
    plane: Option<MovementPlane>,
    pose: PoseReconstructor,
    grab: GrabController,
    last_delta: MovementDelta,
    warned_source: bool,
    warned_plane: bool,
}

impl fmt::Debug for HandTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandTracker")
            .field("has_source", &self.source.is_some())
            .field("plane", &self.plane)
            .field("grab", &self.grab)
            .finish_non_exhaustive()
    }
}

impl HandTracker {
    /// Creates a tracker with no source and no plane assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(id: ControllerId, config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source: None,
            plane: None,
            pose: PoseReconstructor::new(config.pose)?,
            grab: GrabController::new(id, config.grab)?,
            last_delta: MovementDelta::zero(),
            warned_source: false,
            warned_plane: false,
        })
    }

    /// Assigns the landmark source.
    pub fn set_source<S>(&mut self, source: S)
    where
        S: LandmarkSource + Send + 'static,
    {
        self.source = Some(Box::new(source));
        self.warned_source = false;
    }

    /// Removes the landmark source; subsequent pose ticks fail.
    pub fn clear_source(&mut self) {
        self.source = None;
    }

    /// Assigns the movement plane.
    pub fn set_plane(&mut self, plane: MovementPlane) {
        self.plane = Some(plane);
        self.warned_plane = false;
    }

    /// Returns the movement plane, if assigned.
    #[must_use]
    pub fn plane(&self) -> Option<&MovementPlane> {
        self.plane.as_ref()
    }

    /// Returns the pose reconstructor.
    #[must_use]
    pub fn pose(&self) -> &PoseReconstructor {
        &self.pose
    }

    /// Returns the pose reconstructor for reconfiguration.
    pub fn pose_mut(&mut self) -> &mut PoseReconstructor {
        &mut self.pose
    }

    /// Returns the grab controller.
    #[must_use]
    pub fn controller(&self) -> &GrabController {
        &self.grab
    }

    /// Returns the grab controller, for forced releases.
    pub fn controller_mut(&mut self) -> &mut GrabController {
        &mut self.grab
    }

    /// Returns the reconstructed skeleton.
    #[must_use]
    pub fn skeleton(&self) -> &HandSkeleton {
        self.pose.skeleton()
    }

    /// Movement computed on the last pose tick.
    #[must_use]
    pub fn last_delta(&self) -> MovementDelta {
        self.last_delta
    }

    /// Pulls the latest frame and updates the skeleton.
    ///
    /// When a hand was present, the palm and movement are refreshed as
    /// enabled in the pose configuration. Movement needs a plane; without one
    /// it is skipped while the rest of the tick proceeds.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::MissingCollaborator`] if no source is assigned.
    /// The skeleton is left untouched in that case.
    pub fn tick_pose(&mut self) -> Result<&PoseReport> {
        let Some(source) = self.source.as_ref() else {
            return Err(missing(&mut self.warned_source, SOURCE));
        };
        let frame = source.latest();

        let hand_present = match frame {
            Some(frame) => self.pose.update_frame(&frame).hand_present(),
            None => self.pose.update_frame(&HandFrame::empty(0)).hand_present(),
        };

        if hand_present {
            if self.pose.config().palm_enabled {
                self.pose.compute_palm();
            }
            if self.pose.movement_enabled() {
                match self.plane.as_ref() {
                    Some(plane) => self.last_delta = self.pose.compute_movement_delta(plane),
                    None => warn_missing(&mut self.warned_plane, PLANE),
                }
            }
        }

        Ok(self.pose.last_report())
    }

    /// Evaluates grab and release against the current skeleton.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::MissingCollaborator`] if no plane is assigned.
    pub fn tick_grab<W>(&mut self, world: &mut W) -> Result<GrabTransition>
    where
        W: GrabWorld + ?Sized,
    {
        let Some(plane) = self.plane.as_ref() else {
            return Err(missing(&mut self.warned_plane, PLANE));
        };
        Ok(self.grab.evaluate_grab(self.pose.skeleton(), plane, world))
    }

    /// Where the held object should be steered, or the palm while idle.
    ///
    /// Returns `None` until a plane is assigned, and while idle before a palm
    /// has been computed (for instance with palm reconstruction disabled).
    #[must_use]
    pub fn target_position(&self) -> Option<Point3> {
        let plane = self.plane.as_ref()?;
        self.grab
            .held_target(self.pose.skeleton(), plane)
            .or_else(|| self.pose.palm().map(|palm| palm.position))
    }
}

fn warn_missing(warned: &mut bool, what: &'static str) {
    if !*warned {
        warn!(collaborator = what, "required collaborator is not assigned, skipping");
        *warned = true;
    }
}

fn missing(warned: &mut bool, what: &'static str) -> HandGrabError {
    warn_missing(warned, what);
    TrackerError::MissingCollaborator(what).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::grab::{GrabState, GrabbableData, GrabbableStore};
    use crate::landmark::{Landmark, LatestFrame};
    use crate::plane::PlaneAxis;
    use crate::skeleton::{joint, JOINT_COUNT};

    fn open_hand() -> Vec<Landmark> {
        (0..21_u8)
            .map(|i| Landmark::new(0.3 * f64::from(i), 0.0, 0.0))
            .collect()
    }

    fn pinching_hand() -> Vec<Landmark> {
        let mut hand = open_hand();
        hand[joint::INDEX_TIP] = Landmark::new(1.2, 0.5, 0.0);
        hand
    }

    fn plane() -> MovementPlane {
        MovementPlane::from_bounds(
            Point3::new(-10.0, -10.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            PlaneAxis::Z,
        )
        .unwrap()
    }

    fn tracker_with(frames: &LatestFrame) -> HandTracker {
        let mut tracker = HandTracker::new(ControllerId(1), TrackerConfig::default()).unwrap();
        tracker.set_source(frames.clone());
        tracker.set_plane(plane());
        tracker
    }

    #[test]
    fn missing_source_short_circuits() {
        let mut tracker = HandTracker::new(ControllerId(1), TrackerConfig::default()).unwrap();
        let err = tracker.tick_pose().unwrap_err();
        assert!(matches!(
            err,
            HandGrabError::Tracker(TrackerError::MissingCollaborator(SOURCE))
        ));
        assert!(tracker.warned_source);
        assert!(!tracker.skeleton().part(0).unwrap().is_tracked());

        tracker.set_source(LatestFrame::new());
        assert!(!tracker.warned_source);
        assert!(tracker.tick_pose().is_ok());
    }

    #[test]
    fn missing_plane_short_circuits_grab() {
        let mut tracker = HandTracker::new(ControllerId(1), TrackerConfig::default()).unwrap();
        let mut store = GrabbableStore::new();
        let err = tracker.tick_grab(&mut store).unwrap_err();
        assert!(matches!(
            err,
            HandGrabError::Tracker(TrackerError::MissingCollaborator(PLANE))
        ));
        assert!(tracker.target_position().is_none());
    }

    #[test]
    fn no_frame_yet_reports_no_hand() {
        let frames = LatestFrame::new();
        let mut tracker = tracker_with(&frames);
        let report = tracker.tick_pose().unwrap();
        assert!(!report.hand_present());
    }

    #[test]
    fn pose_tick_applies_latest_frame() {
        let frames = LatestFrame::new();
        let mut tracker = tracker_with(&frames);
        frames.publish(HandFrame::new(7, vec![open_hand()]));

        let report = tracker.tick_pose().unwrap();
        assert_eq!(report.positioned(), JOINT_COUNT);
        assert_relative_eq!(
            tracker.skeleton().position(joint::THUMB_TIP).unwrap(),
            Point3::new(-1.2, 0.0, 0.0)
        );
    }

    #[test]
    fn idle_target_is_the_palm() {
        let frames = LatestFrame::new();
        let mut tracker = tracker_with(&frames);
        frames.publish(HandFrame::new(1, vec![open_hand()]));
        tracker.tick_pose().unwrap();

        let palm = tracker.pose().palm().unwrap().position;
        assert_relative_eq!(tracker.target_position().unwrap(), palm);
    }

    #[test]
    fn idle_target_without_palm_is_none() {
        let frames = LatestFrame::new();
        let mut config = TrackerConfig::default();
        config.pose.palm_enabled = false;
        let mut tracker = HandTracker::new(ControllerId(3), config).unwrap();
        tracker.set_source(frames.clone());
        tracker.set_plane(plane());
        frames.publish(HandFrame::new(1, vec![open_hand()]));
        tracker.tick_pose().unwrap();

        assert!(tracker.pose().palm().is_none());
        assert!(tracker.target_position().is_none());

        let mut store = GrabbableStore::new();
        store.add(GrabbableData::new(Point3::new(-1.2, -0.25, 0.0), 0.3));
        frames.publish(HandFrame::new(2, vec![pinching_hand()]));
        tracker.tick_pose().unwrap();
        tracker.tick_grab(&mut store).unwrap();
        assert_relative_eq!(
            tracker.target_position().unwrap(),
            Point3::new(-1.2, -0.25, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn pinch_grabs_and_open_hand_releases() {
        let frames = LatestFrame::new();
        let mut tracker = tracker_with(&frames);
        let mut store = GrabbableStore::new();
        let cube = store.add(GrabbableData::new(Point3::new(-1.2, -0.25, 0.0), 0.3));

        frames.publish(HandFrame::new(1, vec![pinching_hand()]));
        tracker.tick_pose().unwrap();
        let grabbed = tracker.tick_grab(&mut store).unwrap();
        assert_eq!(
            grabbed,
            GrabTransition::Grabbed {
                object: cube,
                finger: joint::INDEX_TIP
            }
        );
        assert_eq!(store.get(cube).unwrap().owner(), Some(ControllerId(1)));

        let target = tracker.target_position().unwrap();
        assert_relative_eq!(target, Point3::new(-1.2, -0.25, 0.0), epsilon = 1e-12);

        frames.publish(HandFrame::new(2, vec![open_hand()]));
        tracker.tick_pose().unwrap();
        let released = tracker.tick_grab(&mut store).unwrap();
        assert_eq!(released, GrabTransition::Released { object: cube });
        assert_eq!(tracker.controller().state(), GrabState::Idle);
        assert!(store.get(cube).unwrap().is_free());
    }

    #[test]
    fn movement_needs_a_plane() {
        let frames = LatestFrame::new();
        let mut config = TrackerConfig::default();
        config.pose = config.pose.with_movement(true);
        let mut tracker = HandTracker::new(ControllerId(2), config).unwrap();
        tracker.set_source(frames.clone());
        frames.publish(HandFrame::new(1, vec![open_hand()]));

        assert!(tracker.tick_pose().is_ok());
        assert!(tracker.warned_plane);
        assert!(!tracker.pose().movement().is_started());

        tracker.set_plane(plane());
        tracker.tick_pose().unwrap();
        assert!(tracker.pose().movement().is_started());
        assert_eq!(tracker.last_delta(), MovementDelta::zero());
    }
}
