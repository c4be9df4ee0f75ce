use serde::{Deserialize, Serialize};

use crate::error::GrabError;
use crate::math::{Point3, Vector3};

use super::{ControllerId, GrabbableId};

/// Bitmask of layers an object belongs to or a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// Layer 0, where unclassified objects live.
    pub const DEFAULT: Self = Self(1);
    /// Layer 6, reserved for objects a hand may pick up.
    pub const GRABBABLE: Self = Self(1 << 6);

    /// Mask containing a single layer index.
    ///
    /// Indices above 31 yield [`LayerMask::NONE`].
    #[must_use]
    pub const fn layer(index: u32) -> Self {
        if index < 32 {
            Self(1 << index)
        } else {
            Self::NONE
        }
    }

    /// Returns `true` if the masks share at least one layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two masks.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A sphere swept along a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereCast {
    /// Centre of the sphere at the start of the sweep.
    pub origin: Point3,
    /// Unit sweep direction, or zero for an overlap-only test.
    pub direction: Vector3,
    /// Sphere radius.
    pub radius: f64,
    /// Maximum sweep distance; `None` is unbounded.
    pub max_distance: Option<f64>,
    /// Layers the cast may hit.
    pub layer: LayerMask,
}

/// Spatial lookup of grabbable objects.
///
/// Implemented by whatever owns collision geometry: a physics engine adapter
/// or [`GrabbableStore`](super::GrabbableStore).
pub trait SpatialQuery {
    /// Returns the first grabbable object hit by the cast, if any.
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GrabbableId>;
}

/// Receiver of grab and release notifications.
pub trait GrabNotify {
    /// Tells `object` it was grabbed (`true`) or released (`false`) by
    /// `controller`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object refuses the change, such as a grab of
    /// an object another controller already holds.
    fn notify_grabbed(
        &mut self,
        object: GrabbableId,
        grabbed: bool,
        controller: ControllerId,
    ) -> Result<(), GrabError>;
}
