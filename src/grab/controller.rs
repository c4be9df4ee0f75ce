use tracing::{debug, warn};

use crate::config::GrabConfig;
use crate::error::Result;
use crate::math::{midpoint, safe_normalize, Point3};
use crate::plane::MovementPlane;
use crate::skeleton::{joint, HandSkeleton, PINCH_FINGERTIPS};

use super::query::{GrabNotify, SpatialQuery, SphereCast};
use super::{ControllerId, GrabbableId};

/// Grab state of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabState {
    /// Nothing held.
    #[default]
    Idle,
    /// Holding `object`, grabbed by pinching `finger` against the thumb.
    Holding { object: GrabbableId, finger: usize },
}

/// What a call to [`GrabController::evaluate_grab`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabTransition {
    /// State unchanged.
    None,
    /// `Idle -> Holding`.
    Grabbed { object: GrabbableId, finger: usize },
    /// `Holding -> Idle`.
    Released { object: GrabbableId },
}

/// Thumb-to-fingertip distances for one tick.
///
/// Entries follow [`PINCH_FINGERTIPS`]; untracked fingertips are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchReading {
    pub distances: [Option<f64>; 4],
}

impl PinchReading {
    /// Measures the pinch distances, or `None` while the thumb tip has never
    /// been tracked.
    #[must_use]
    pub fn measure(skeleton: &HandSkeleton) -> Option<Self> {
        let thumb = skeleton.part(joint::THUMB_TIP).filter(|p| p.is_tracked())?;
        let distances = PINCH_FINGERTIPS.map(|tip| {
            skeleton
                .part(tip)
                .filter(|p| p.is_tracked())
                .map(|p| nalgebra::distance(&p.position, &thumb.position))
        });
        Some(Self { distances })
    }

    /// Smallest distance across all tracked fingertips.
    #[must_use]
    pub fn min_distance(&self) -> Option<f64> {
        self.distances.iter().flatten().copied().reduce(f64::min)
    }

    /// Fingertips within `threshold` of the thumb, in tie-break order.
    pub fn pinching(&self, threshold: f64) -> impl Iterator<Item = usize> + '_ {
        PINCH_FINGERTIPS
            .iter()
            .zip(self.distances)
            .filter(move |(_, d)| d.is_some_and(|d| d <= threshold))
            .map(|(&tip, _)| tip)
    }
}

/// Anything that can both answer spatial queries and arbitrate ownership.
pub trait GrabWorld: SpatialQuery + GrabNotify {}

impl<T: SpatialQuery + GrabNotify + ?Sized> GrabWorld for T {}

/// Pinch-gesture grab state machine for one hand.
///
/// Holds at most one object at a time. Grab and release notifications are sent
/// only on transitions, never on repeated frames.
#[derive(Debug, Clone)]
pub struct GrabController {
    id: ControllerId,
    config: GrabConfig,
    state: GrabState,
    last_pinch: Option<PinchReading>,
}

impl GrabController {
    /// Creates an idle controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(id: ControllerId, config: GrabConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id,
            config,
            state: GrabState::Idle,
            last_pinch: None,
        })
    }

    /// Returns the controller identity.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &GrabConfig {
        &self.config
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> GrabState {
        self.state
    }

    /// Returns the held object, if any.
    #[must_use]
    pub fn held_object(&self) -> Option<GrabbableId> {
        match self.state {
            GrabState::Idle => None,
            GrabState::Holding { object, .. } => Some(object),
        }
    }

    /// Pinch distances measured on the last evaluation.
    #[must_use]
    pub fn last_pinch(&self) -> Option<&PinchReading> {
        self.last_pinch.as_ref()
    }

    /// Runs one tick of pinch detection against the reconstructed skeleton.
    ///
    /// While idle, the first fingertip (index, middle, ring, pinky) within the
    /// grab threshold of the thumb casts a sphere from the pinch midpoint,
    /// snapped onto the plane, towards the thumb tip. The first grabbable hit
    /// that accepts the grab becomes the held object.
    ///
    /// While holding, the object is released once every tracked fingertip is
    /// farther than the threshold from the thumb, whichever finger started the
    /// grab.
    pub fn evaluate_grab<W>(
        &mut self,
        skeleton: &HandSkeleton,
        plane: &MovementPlane,
        world: &mut W,
    ) -> GrabTransition
    where
        W: GrabWorld + ?Sized,
    {
        let Some(pinch) = PinchReading::measure(skeleton) else {
            return GrabTransition::None;
        };
        self.last_pinch = Some(pinch);

        match self.state {
            GrabState::Idle => self.try_grab(skeleton, plane, world, &pinch),
            GrabState::Holding { object, .. } => {
                let released = pinch
                    .min_distance()
                    .is_some_and(|d| d > self.config.grab_threshold);
                if released {
                    self.release(object, world)
                } else {
                    GrabTransition::None
                }
            }
        }
    }

    /// Releases the held object regardless of the current pinch.
    pub fn force_release<W>(&mut self, world: &mut W) -> GrabTransition
    where
        W: GrabNotify + ?Sized,
    {
        match self.state {
            GrabState::Idle => GrabTransition::None,
            GrabState::Holding { object, .. } => self.release(object, world),
        }
    }

    /// Position the held object should move towards.
    ///
    /// While holding, this is the midpoint of the grabbing fingertip and the
    /// thumb tip, snapped onto the plane. While idle it is `palm`.
    #[must_use]
    pub fn report_target_position(
        &self,
        skeleton: &HandSkeleton,
        palm: &Point3,
        plane: &MovementPlane,
    ) -> Point3 {
        self.held_target(skeleton, plane).unwrap_or(*palm)
    }

    /// Midpoint of the grabbing fingertip and the thumb tip, snapped onto the
    /// plane, or `None` while idle.
    #[must_use]
    pub fn held_target(&self, skeleton: &HandSkeleton, plane: &MovementPlane) -> Option<Point3> {
        let GrabState::Holding { finger, .. } = self.state else {
            return None;
        };
        let tip = skeleton.position(finger)?;
        let thumb = skeleton.position(joint::THUMB_TIP)?;
        Some(plane.snap(&midpoint(&tip, &thumb)))
    }

    fn try_grab<W>(
        &mut self,
        skeleton: &HandSkeleton,
        plane: &MovementPlane,
        world: &mut W,
        pinch: &PinchReading,
    ) -> GrabTransition
    where
        W: GrabWorld + ?Sized,
    {
        let Some(thumb) = skeleton.position(joint::THUMB_TIP) else {
            return GrabTransition::None;
        };

        for finger in pinch.pinching(self.config.grab_threshold) {
            let Some(tip) = skeleton.position(finger) else {
                continue;
            };
            let mid = midpoint(&tip, &thumb);
            let (direction, _) = safe_normalize(&(thumb - mid));
            let cast = SphereCast {
                origin: plane.snap(&mid),
                direction,
                radius: self.config.cast_radius,
                max_distance: self.config.cast_distance,
                layer: self.config.layer,
            };

            let Some(object) = world.sphere_cast(&cast) else {
                continue;
            };
            match world.notify_grabbed(object, true, self.id) {
                Ok(()) => {
                    self.state = GrabState::Holding { object, finger };
                    debug!(controller = %self.id, ?object, finger, "grabbed");
                    return GrabTransition::Grabbed { object, finger };
                }
                Err(err) => {
                    warn!(controller = %self.id, ?object, %err, "grab rejected");
                }
            }
        }
        GrabTransition::None
    }

    fn release<W>(&mut self, object: GrabbableId, world: &mut W) -> GrabTransition
    where
        W: GrabNotify + ?Sized,
    {
        if let Err(err) = world.notify_grabbed(object, false, self.id) {
            warn!(controller = %self.id, ?object, %err, "release not acknowledged");
        }
        self.state = GrabState::Idle;
        debug!(controller = %self.id, ?object, "released");
        GrabTransition::Released { object }
    }
}
