mod controller;
pub mod query;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use controller::{GrabController, GrabState, GrabTransition, GrabWorld, PinchReading};
pub use query::{GrabNotify, LayerMask, SpatialQuery, SphereCast};
pub use store::{GrabbableData, GrabbableId, GrabbableStore};

/// Identity of one grab controller, used as the owner tag on held objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerId(pub u32);

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
