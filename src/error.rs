use thiserror::Error;

use crate::grab::ControllerId;

/// Top-level error type for hand tracking and grab interaction.
#[derive(Debug, Error)]
pub enum HandGrabError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grab(#[from] GrabError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Errors related to geometric construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("bounds on axis {axis} are inverted: min {min} > max {max}")]
    InvalidBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Errors raised while validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Errors related to grabbable ownership.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrabError {
    #[error("grabbable object not found")]
    UnknownObject,

    #[error("object is already held by controller {owner}")]
    AlreadyHeld { owner: ControllerId },

    #[error("object is not held by controller {controller}")]
    NotHeldBy { controller: ControllerId },
}

/// Errors raised by the per-tick tracker when a collaborator is absent.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("required collaborator is not assigned: {0}")]
    MissingCollaborator(&'static str),
}

/// Convenience type alias for results using [`HandGrabError`].
pub type Result<T> = std::result::Result<T, HandGrabError>;
