//! Tunable parameters for pose reconstruction, grabbing and trial scoring.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::grab::LayerMask;
use crate::landmark::LandmarkConvention;
use crate::skeleton::{joint, JOINT_COUNT};

/// Pose reconstruction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Per-axis scale applied to negated landmark coordinates.
    pub scale: [f64; 3],
    /// Euler offset in degrees composed onto every derived orientation.
    pub rotation_offset_deg: [f64; 3],
    /// Coordinate convention of the landmark used for the anchor.
    pub anchor_convention: LandmarkConvention,
    /// Multiplier applied to the anchor landmark before plane projection.
    pub anchor_gain: f64,
    /// Joint whose landmark drives the anchor.
    pub anchor_landmark: usize,
    /// Reconstruct the palm transform after each pose update.
    pub palm_enabled: bool,
    /// Track anchor movement after each pose update.
    pub movement_enabled: bool,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.0, 1.0],
            rotation_offset_deg: [0.0, 0.0, 0.0],
            anchor_convention: LandmarkConvention::Unit,
            anchor_gain: 1.0,
            anchor_landmark: joint::WRIST,
            palm_enabled: true,
            movement_enabled: false,
        }
    }
}

impl PoseConfig {
    /// Derives the scale from a hand model's scale nested inside a rig's
    /// scale. Without a model the scale stays at `[1, 1, 1]`.
    #[must_use]
    pub fn with_nested_scale(mut self, model: Option<[f64; 3]>, rig: [f64; 3]) -> Self {
        match model {
            Some(model) => {
                self.scale = [model[0] * rig[0], model[1] * rig[1], model[2] * rig[2]];
            }
            None => {
                warn!("hand model scale unavailable, using unit scale");
                self.scale = [1.0, 1.0, 1.0];
            }
        }
        self
    }

    /// Set the orientation offset in degrees.
    #[must_use]
    pub fn with_rotation_offset(mut self, degrees: [f64; 3]) -> Self {
        self.rotation_offset_deg = degrees;
        self
    }

    /// Set the anchor landmark convention.
    #[must_use]
    pub fn with_anchor_convention(mut self, convention: LandmarkConvention) -> Self {
        self.anchor_convention = convention;
        self
    }

    /// Enable or disable movement tracking.
    #[must_use]
    pub fn with_movement(mut self, enabled: bool) -> Self {
        self.movement_enabled = enabled;
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite scale, offset or gain values, or an
    /// anchor joint outside the skeleton.
    pub fn validate(&self) -> Result<()> {
        for (name, values) in [
            ("scale", &self.scale),
            ("rotation_offset_deg", &self.rotation_offset_deg),
        ] {
            if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(invalid(name, bad, "must be finite"));
            }
        }
        if !self.anchor_gain.is_finite() {
            return Err(invalid("anchor_gain", self.anchor_gain, "must be finite"));
        }
        if self.anchor_landmark >= JOINT_COUNT {
            #[allow(clippy::cast_precision_loss)]
            let value = self.anchor_landmark as f64;
            return Err(invalid("anchor_landmark", value, "must name a hand joint"));
        }
        Ok(())
    }
}

/// Pinch detection and spatial query parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Largest thumb-to-fingertip distance that still counts as a pinch.
    pub grab_threshold: f64,
    /// Radius of the sphere cast issued from the pinch midpoint.
    pub cast_radius: f64,
    /// Maximum travel of the sphere cast; `None` is unbounded.
    pub cast_distance: Option<f64>,
    /// Layers the sphere cast may hit.
    pub layer: LayerMask,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            grab_threshold: 1.0,
            cast_radius: 0.1,
            cast_distance: None,
            layer: LayerMask::GRABBABLE,
        }
    }
}

impl GrabConfig {
    /// Set the pinch threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.grab_threshold = threshold;
        self
    }

    /// Set the sphere cast radius.
    #[must_use]
    pub fn with_cast_radius(mut self, radius: f64) -> Self {
        self.cast_radius = radius;
        self
    }

    /// Set the layers the cast may hit.
    #[must_use]
    pub fn with_layer(mut self, layer: LayerMask) -> Self {
        self.layer = layer;
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is negative or non-finite, the cast
    /// radius is not positive, or the cast distance is negative.
    pub fn validate(&self) -> Result<()> {
        if !self.grab_threshold.is_finite() || self.grab_threshold < 0.0 {
            return Err(invalid(
                "grab_threshold",
                self.grab_threshold,
                "must be finite and non-negative",
            ));
        }
        if !self.cast_radius.is_finite() || self.cast_radius <= 0.0 {
            return Err(invalid("cast_radius", self.cast_radius, "must be positive"));
        }
        if let Some(distance) = self.cast_distance {
            if distance.is_nan() || distance < 0.0 {
                return Err(invalid("cast_distance", distance, "must be non-negative"));
            }
        }
        Ok(())
    }
}

/// Trial scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Seconds an object must stay in the target zone to complete a trial.
    pub dwell_seconds: f64,
    /// Score awarded for an instant, perfectly placed trial.
    pub base_score: f64,
    /// Score lost per second of trial time.
    pub time_weight: f64,
    /// Score lost per unit of final distance to the target.
    pub distance_weight: f64,
    /// Trials per experiment run.
    pub max_rounds: u32,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            dwell_seconds: 0.5,
            base_score: 10.0,
            time_weight: 2.0,
            distance_weight: 1.5,
            max_rounds: 10,
        }
    }
}

impl TrialConfig {
    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the dwell time is negative or any weight is
    /// non-finite.
    pub fn validate(&self) -> Result<()> {
        if !self.dwell_seconds.is_finite() || self.dwell_seconds < 0.0 {
            return Err(invalid(
                "dwell_seconds",
                self.dwell_seconds,
                "must be finite and non-negative",
            ));
        }
        for (name, value) in [
            ("base_score", self.base_score),
            ("time_weight", self.time_weight),
            ("distance_weight", self.distance_weight),
        ] {
            if !value.is_finite() {
                return Err(invalid(name, value, "must be finite"));
            }
        }
        Ok(())
    }
}

/// Complete tracker configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub pose: PoseConfig,
    pub grab: GrabConfig,
    pub trial: TrialConfig,
}

impl TrackerConfig {
    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<()> {
        self.pose.validate()?;
        self.grab.validate()?;
        self.trial.validate()
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> crate::HandGrabError {
    ConfigError::InvalidParameter {
        name,
        value,
        reason,
    }
    .into()
}
