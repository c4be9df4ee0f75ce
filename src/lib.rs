pub mod config;
pub mod error;
pub mod grab;
pub mod landmark;
pub mod math;
pub mod plane;
pub mod pose;
pub mod skeleton;
pub mod tracker;
pub mod trial;

pub use config::{GrabConfig, PoseConfig, TrackerConfig, TrialConfig};
pub use error::{HandGrabError, Result};
pub use grab::{ControllerId, GrabController, GrabTransition, GrabbableStore};
pub use landmark::{HandFrame, Landmark, LandmarkSource, LatestFrame};
pub use plane::{MovementPlane, PlaneAxis};
pub use pose::PoseReconstructor;
pub use tracker::HandTracker;
