//! Wheel-power motion model for the particle filter.
//!
//! The robot is a differential drive whose wheels respond to commanded
//! power through a first-order lag: each applied power is the average of
//! the new command and the previously applied power. The smoothed powers
//! then move the robot:
//!
//! ```text
//! lin    = (out_left + out_right) / 2
//! x'     = x + lin * cos(theta)
//! y'     = y + lin * sin(theta)
//! theta' = theta + degrees(out_right - out_left) / diameter
//! ```
//!
//! Every particle draws its own multiplicative noise factor per wheel, so
//! motion uncertainty grows as the robot drives.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::Deserialize;

use crate::core::math::{deg_to_rad, rad_to_deg};
use crate::core::types::Pose;
use crate::error::{Error, Result};

/// Configuration for the motion model.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MotionModelConfig {
    /// Standard deviation of the per-wheel multiplicative noise factor.
    /// Typical: 0.015 (1.5% of nominal power).
    pub noise_stddev: f64,

    /// Commands are clamped to [-max_power, max_power].
    pub max_power: f64,
}

impl Default for MotionModelConfig {
    fn default() -> Self {
        Self {
            noise_stddev: 0.015,
            max_power: 1.0,
        }
    }
}

impl MotionModelConfig {
    /// Deterministic motion (noise factors fixed at 1).
    pub fn noiseless() -> Self {
        Self {
            noise_stddev: 0.0,
            ..Default::default()
        }
    }

    /// Check that the parameters describe a usable model.
    pub fn validate(&self) -> Result<()> {
        if !self.noise_stddev.is_finite() || self.noise_stddev < 0.0 {
            return Err(Error::Config(format!(
                "motion.noise_stddev must be finite and >= 0, got {}",
                self.noise_stddev
            )));
        }
        if !self.max_power.is_finite() || self.max_power <= 0.0 {
            return Err(Error::Config(format!(
                "motion.max_power must be finite and > 0, got {}",
                self.max_power
            )));
        }
        Ok(())
    }
}

/// Nominal smoothed wheel powers for one prediction step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionStep {
    /// Smoothed left wheel power
    pub left: f64,
    /// Smoothed right wheel power
    pub right: f64,
}

/// Differential-drive motion model with actuator lag.
///
/// Holds the previously applied powers. They are shared by every particle:
/// the lag belongs to the physical robot, not to individual hypotheses.
#[derive(Debug, Clone)]
pub struct MotionModel {
    config: MotionModelConfig,
    diameter: f64,
    applied: MotionStep,
}

impl MotionModel {
    /// Create a motion model for a robot of the given diameter.
    pub fn new(config: MotionModelConfig, diameter: f64) -> Self {
        Self {
            config,
            diameter,
            applied: MotionStep::default(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MotionModelConfig {
        &self.config
    }

    /// Robot diameter used for the heading update.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Powers applied on the previous step.
    pub fn applied(&self) -> MotionStep {
        self.applied
    }

    /// Forget the actuator history.
    pub fn reset(&mut self) {
        self.applied = MotionStep::default();
    }

    /// Smooth a new command against the previous powers and remember the
    /// result for the next call.
    ///
    /// Commands are clamped to the configured power range. Non-finite
    /// commands are treated as zero.
    pub fn advance(&mut self, left: f64, right: f64) -> MotionStep {
        let left = self.sanitize(left);
        let right = self.sanitize(right);

        let step = MotionStep {
            left: (left + self.applied.left) / 2.0,
            right: (right + self.applied.right) / 2.0,
        };
        self.applied = step;
        step
    }

    fn sanitize(&self, power: f64) -> f64 {
        if !power.is_finite() {
            log::warn!("Ignoring non-finite wheel power {}", power);
            return 0.0;
        }
        power.clamp(-self.config.max_power, self.config.max_power)
    }

    /// Sample a new pose for one particle.
    ///
    /// Draws independent noise factors for both wheels, scales the nominal
    /// step by them and applies the kinematics.
    pub fn sample<R: Rng + ?Sized>(&self, pose: &Pose, step: &MotionStep, rng: &mut R) -> Pose {
        let left = step.left * self.noise_factor(rng);
        let right = step.right * self.noise_factor(rng);
        self.apply(pose, left, right)
    }

    /// Draw one multiplicative noise factor around 1.
    fn noise_factor<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.config.noise_stddev <= 0.0 {
            return 1.0;
        }
        let z: f64 = rng.sample(StandardNormal);
        1.0 + z * self.config.noise_stddev
    }

    /// Move a pose by the given effective wheel powers.
    pub fn apply(&self, pose: &Pose, left: f64, right: f64) -> Pose {
        let lin = (left + right) / 2.0;
        let (sin_t, cos_t) = deg_to_rad(pose.theta).sin_cos();

        Pose::new(
            pose.x + lin * cos_t,
            pose.y + lin * sin_t,
            pose.theta + rad_to_deg(right - left) / self.diameter,
        )
    }
}
