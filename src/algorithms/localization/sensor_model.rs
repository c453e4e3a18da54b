//! Sensor model for the particle filter update step.
//!
//! The robot carries a ring of infrared ranging beams. Each beam reports the
//! distance to the nearest wall inside its sensing cone. For a hypothesized
//! pose the model predicts that distance from the known maze walls and scores
//! the observed reading against it with a Gaussian residual kernel.

use serde::Deserialize;

use crate::algorithms::mapping::{GridMap, cone_distance, raycast::raycast, sampled_cone_distance};
use crate::core::types::{Point2D, Pose};
use crate::error::{Error, Result};

/// How a sensing cone is evaluated against the walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConeMode {
    /// Nearest wall point anywhere inside the cone.
    #[default]
    Exact,
    /// Minimum over `rays_per_beam` evenly spaced rays.
    Sampled,
    /// Central ray only.
    CentralRay,
}

/// Configuration for the sensor model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorModelConfig {
    /// Beam mounting angles in degrees, robot frame (0 = forward, CCW positive).
    pub beam_angles: Vec<f64>,

    /// Total cone aperture of every beam in degrees.
    /// Typical: 60 (±30 around the beam axis)
    pub aperture: f64,

    /// Cone evaluation method.
    pub cone: ConeMode,

    /// Rays per beam when `cone = "sampled"`.
    pub rays_per_beam: usize,

    /// Maximum sensor range (maze units). Predictions and readings are
    /// clamped to it.
    pub max_range: f64,

    /// Standard deviation of the residual kernel (maze units).
    pub sigma_hit: f64,

    /// Constant added to every weight so no particle is ever ruled out.
    pub floor_weight: f64,

    /// Weight distinct poses on the rayon pool.
    pub parallel: bool,
}

impl Default for SensorModelConfig {
    fn default() -> Self {
        Self {
            beam_angles: vec![0.0, 60.0, -60.0, 180.0],
            aperture: 60.0,
            cone: ConeMode::Exact,
            rays_per_beam: 7,
            max_range: 10.0,
            sigma_hit: 0.25,
            floor_weight: 0.1,
            parallel: false,
        }
    }
}

impl SensorModelConfig {
    /// Create a fast configuration (central ray only).
    pub fn fast() -> Self {
        Self {
            cone: ConeMode::CentralRay,
            ..Default::default()
        }
    }

    /// Number of beams.
    pub fn beam_count(&self) -> usize {
        self.beam_angles.len()
    }

    /// Check that the parameters describe a usable model.
    pub fn validate(&self) -> Result<()> {
        if self.beam_angles.is_empty() {
            return Err(Error::Config("sensor.beam_angles must not be empty".into()));
        }
        if let Some(angle) = self.beam_angles.iter().find(|a| !a.is_finite()) {
            return Err(Error::Config(format!("sensor.beam_angles contains {}", angle)));
        }
        if !self.aperture.is_finite() || !(0.0..360.0).contains(&self.aperture) {
            return Err(Error::Config(format!(
                "sensor.aperture must be in [0, 360), got {}",
                self.aperture
            )));
        }
        if self.cone == ConeMode::Sampled && self.rays_per_beam == 0 {
            return Err(Error::Config("sensor.rays_per_beam must be >= 1".into()));
        }
        if !self.max_range.is_finite() || self.max_range <= 0.0 {
            return Err(Error::Config(format!(
                "sensor.max_range must be finite and > 0, got {}",
                self.max_range
            )));
        }
        if !self.sigma_hit.is_finite() || self.sigma_hit <= 0.0 {
            return Err(Error::Config(format!(
                "sensor.sigma_hit must be finite and > 0, got {}",
                self.sigma_hit
            )));
        }
        if !self.floor_weight.is_finite() || self.floor_weight < 0.0 {
            return Err(Error::Config(format!(
                "sensor.floor_weight must be finite and >= 0, got {}",
                self.floor_weight
            )));
        }
        Ok(())
    }
}

/// Trait for sensor models used in the particle filter.
pub trait SensorModel {
    /// Number of readings expected per update.
    fn beam_count(&self) -> usize;

    /// Predicted distance for every beam from `pose`.
    fn expected_ranges(&self, pose: &Pose, map: &GridMap) -> Vec<f64>;

    /// Unnormalized weight of `pose` given one reading per beam.
    ///
    /// Always at least the floor weight.
    fn weight(&self, pose: &Pose, observed: &[f64], map: &GridMap) -> f64;
}

/// Beam-cone ranging model.
///
/// Beams sit on the robot's rim, half a diameter from its center. Each
/// beam's likelihood is `exp(-0.5 * (residual / sigma_hit)^2)` and beams
/// combine multiplicatively on top of the floor weight.
#[derive(Debug, Clone)]
pub struct BeamConeModel {
    config: SensorModelConfig,
    mount_radius: f64,
}

impl BeamConeModel {
    /// Create a model for a robot of the given diameter.
    pub fn new(config: SensorModelConfig, diameter: f64) -> Self {
        Self {
            config,
            mount_radius: diameter / 2.0,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SensorModelConfig {
        &self.config
    }

    /// Predicted distance for a single beam.
    pub fn expected_range(&self, pose: &Pose, beam_angle: f64, map: &GridMap) -> f64 {
        let mount = pose.offset_point(beam_angle, self.mount_radius);
        let heading = pose.theta + beam_angle;
        let half_aperture = self.config.aperture / 2.0;
        let max_range = self.config.max_range;
        let walls = map.walls();

        match self.config.cone {
            ConeMode::Exact => cone_distance(mount, heading, half_aperture, max_range, walls),
            ConeMode::Sampled => sampled_cone_distance(
                mount,
                heading,
                half_aperture,
                self.config.rays_per_beam,
                max_range,
                walls,
            ),
            ConeMode::CentralRay => raycast(mount, Point2D::from_heading(heading), max_range, walls),
        }
    }

    /// Likelihood of one reading given its prediction.
    #[inline]
    pub fn beam_likelihood(&self, predicted: f64, observed: f64) -> f64 {
        let max_range = self.config.max_range;
        let residual = predicted.min(max_range) - observed.min(max_range);
        let z = residual / self.config.sigma_hit;
        (-0.5 * z * z).exp()
    }
}

impl SensorModel for BeamConeModel {
    fn beam_count(&self) -> usize {
        self.config.beam_count()
    }

    fn expected_ranges(&self, pose: &Pose, map: &GridMap) -> Vec<f64> {
        self.config
            .beam_angles
            .iter()
            .map(|&beam| self.expected_range(pose, beam, map))
            .collect()
    }

    fn weight(&self, pose: &Pose, observed: &[f64], map: &GridMap) -> f64 {
        let likelihood: f64 = self
            .config
            .beam_angles
            .iter()
            .zip(observed)
            .map(|(&beam, &reading)| self.beam_likelihood(self.expected_range(pose, beam, map), reading))
            .product();

        self.config.floor_weight + likelihood
    }
}
