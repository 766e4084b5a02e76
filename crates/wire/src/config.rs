//! Wiggle wire configuration
//!
//! One `WiggleWireConfig` exists per connection category (normal, recursive,
//! self, preview). It is read-only during a frame.

use joint_core::{JointError, JointResult, Validatable};
use serde::{Deserialize, Serialize};

/// Parameters controlling how a simulated wire sags, settles and reacts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiggleWireConfig {
    /// Spring stiffness (k). Higher values move faster toward the target offset.
    pub stiffness: f32,

    /// Damping ratio (zeta). < 1 oscillates, 1 is critical, > 1 is overdamped.
    pub damping_ratio: f32,

    /// Extra length factor. 1.0 is a straight line, 1.15 is 15% longer.
    pub slack_factor: f32,

    /// Gravity droop multiplier
    pub hang_factor: f32,

    /// Maximum sag in canvas units
    pub max_sag: f32,

    /// Bezier tangent multiplier, controls curve sharpness near the pins
    pub tangent_factor: f32,

    /// Seconds without interaction before adaptive damping reaches its maximum
    pub inactivity_threshold: f32,

    /// Distance below which the wire stays fully relaxed
    pub relaxed_distance_threshold: f32,

    /// Distance above which the wire is fully taut
    pub tension_distance_threshold: f32,

    /// How strongly endpoint movement kicks the wire
    pub movement_response_factor: f32,
}

impl WiggleWireConfig {
    /// Build a config from every field, in declaration order
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        stiffness: f32,
        damping_ratio: f32,
        slack_factor: f32,
        hang_factor: f32,
        max_sag: f32,
        tangent_factor: f32,
        inactivity_threshold: f32,
        relaxed_distance_threshold: f32,
        tension_distance_threshold: f32,
        movement_response_factor: f32,
    ) -> Self {
        Self {
            stiffness,
            damping_ratio,
            slack_factor,
            hang_factor,
            max_sag,
            tangent_factor,
            inactivity_threshold,
            relaxed_distance_threshold,
            tension_distance_threshold,
            movement_response_factor,
        }
    }

    /// The loose, bouncy preset the graph editor ships with
    pub fn editor_preset() -> Self {
        Self::new(100.0, 0.1, 1.5, 1.5, 1000.0, 1.4, 0.75, 50.0, 1500.0, 3.0)
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping_ratio(mut self, damping_ratio: f32) -> Self {
        self.damping_ratio = damping_ratio;
        self
    }

    pub fn with_slack(mut self, slack_factor: f32, hang_factor: f32) -> Self {
        self.slack_factor = slack_factor;
        self.hang_factor = hang_factor;
        self
    }

    pub fn with_max_sag(mut self, max_sag: f32) -> Self {
        self.max_sag = max_sag;
        self
    }

    pub fn with_distance_thresholds(mut self, relaxed: f32, tension: f32) -> Self {
        self.relaxed_distance_threshold = relaxed;
        self.tension_distance_threshold = tension;
        self
    }
}

impl Default for WiggleWireConfig {
    fn default() -> Self {
        Self::new(100.0, 0.8, 1.15, 1.0, 200.0, 1.4, 0.75, 300.0, 600.0, 1.0)
    }
}

fn at_least(field: &str, value: f32, min: f32) -> JointResult<()> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(JointError::config(field, format!("must be >= {min}, got {value}")))
    }
}

impl Validatable for WiggleWireConfig {
    fn validate(&self) -> JointResult<()> {
        at_least("stiffness", self.stiffness, 1.0)?;
        at_least("damping_ratio", self.damping_ratio, 0.1)?;
        at_least("slack_factor", self.slack_factor, 1.0)?;
        at_least("hang_factor", self.hang_factor, 0.0)?;
        at_least("max_sag", self.max_sag, 0.0)?;
        at_least("tangent_factor", self.tangent_factor, 0.5)?;
        at_least("inactivity_threshold", self.inactivity_threshold, 0.1)?;
        at_least(
            "relaxed_distance_threshold",
            self.relaxed_distance_threshold,
            50.0,
        )?;
        at_least(
            "tension_distance_threshold",
            self.tension_distance_threshold,
            100.0,
        )?;
        at_least(
            "movement_response_factor",
            self.movement_response_factor,
            0.0,
        )?;

        if self.tension_distance_threshold <= self.relaxed_distance_threshold {
            return Err(JointError::config(
                "tension_distance_threshold",
                format!(
                    "must be greater than relaxed_distance_threshold ({})",
                    self.relaxed_distance_threshold
                ),
            ));
        }
        Ok(())
    }
}
