//! Particle filter (Monte Carlo Localization) implementation.
//!
//! Starts from a uniform spread over every maze cell, moves particles with
//! the wheel-power motion model, weights them against beam-cone readings
//! and resamples after every measurement.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::Deserialize;

use crate::algorithms::mapping::GridMap;
use crate::core::types::Pose;
use crate::error::{Error, Result};

use super::estimator::{DistinctPoses, estimate_mode, mean_pose};
use super::motion_model::{MotionModel, MotionModelConfig, MotionStep};
use super::resampler::{Resampler, ResamplingStrategy};
use super::sensor_model::{BeamConeModel, SensorModel, SensorModelConfig};
use super::trace::{NoopTrace, TracePhase, TraceSink};

/// A single particle representing a possible robot pose.
///
/// Weights live alongside the population, not inside particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Hypothesized robot pose.
    pub pose: Pose,
}

impl Particle {
    /// Create a new particle.
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }
}

/// Configuration for the particle filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleFilterConfig {
    /// Number of particles, constant for the filter lifetime.
    pub num_particles: usize,

    /// Robot diameter (maze units). Sets the beam mounting radius and the
    /// turn rate.
    pub diameter: f64,

    /// Resampling strategy.
    pub resampling: ResamplingStrategy,

    /// Position noise (standard deviation) added after resampling.
    /// 0 disables.
    pub jitter_xy: f64,

    /// Heading noise in degrees added after resampling. 0 disables.
    pub jitter_theta: f64,

    /// Random seed for deterministic behavior (0 for random).
    pub seed: u64,

    /// Motion model configuration.
    pub motion: MotionModelConfig,

    /// Sensor model configuration.
    pub sensor: SensorModelConfig,
}

impl Default for ParticleFilterConfig {
    fn default() -> Self {
        Self {
            num_particles: 500,
            diameter: 1.0,
            resampling: ResamplingStrategy::Systematic,
            jitter_xy: 0.0,
            jitter_theta: 0.0,
            seed: 0,
            motion: MotionModelConfig::default(),
            sensor: SensorModelConfig::default(),
        }
    }
}

impl ParticleFilterConfig {
    /// Check that the parameters describe a usable filter.
    pub fn validate(&self) -> Result<()> {
        if self.num_particles == 0 {
            return Err(Error::Config("filter.num_particles must be >= 1".into()));
        }
        if !self.diameter.is_finite() || self.diameter <= 0.0 {
            return Err(Error::Config(format!(
                "filter.diameter must be finite and > 0, got {}",
                self.diameter
            )));
        }
        for (name, value) in [("jitter_xy", self.jitter_xy), ("jitter_theta", self.jitter_theta)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "filter.{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        self.motion.validate()?;
        self.sensor.validate()
    }
}

/// State of the particle filter for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ParticleFilterState {
    /// Effective number of particles at the last update.
    pub neff: f64,
    /// Largest raw weight at the last update.
    pub max_weight: f64,
    /// Distinct poses weighted at the last update.
    pub distinct_poses: usize,
    /// Total number of measurement updates.
    pub iterations: u64,
}

/// Monte Carlo Localization particle filter.
///
/// Generic over the random source so tests can inject a seeded generator.
pub struct ParticleFilter<R: Rng = SmallRng> {
    config: ParticleFilterConfig,
    map: Arc<GridMap>,
    particles: Vec<Particle>,
    motion_model: MotionModel,
    sensor_model: BeamConeModel,
    resampler: Resampler,
    rng: R,
    trace: Box<dyn TraceSink>,
    state: ParticleFilterState,
}

impl ParticleFilter<SmallRng> {
    /// Create a filter seeded from `config.seed` (0 seeds from OS entropy).
    pub fn from_seed(config: ParticleFilterConfig, map: Arc<GridMap>) -> Result<Self> {
        let rng = if config.seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.seed)
        };
        Self::new(config, map, rng)
    }
}

impl<R: Rng> ParticleFilter<R> {
    /// Create a new particle filter spread uniformly over the maze cells.
    pub fn new(config: ParticleFilterConfig, map: Arc<GridMap>, mut rng: R) -> Result<Self> {
        config.validate()?;

        let motion_model = MotionModel::new(config.motion, config.diameter);
        let sensor_model = BeamConeModel::new(config.sensor.clone(), config.diameter);
        let resampler = Resampler::new(config.resampling);
        let particles = Self::initialize_particles(config.num_particles, &map, &mut rng);

        log::info!(
            "Particle filter: {} particles over {}x{} cells, {} beams",
            config.num_particles,
            map.rows(),
            map.cols(),
            sensor_model.beam_count()
        );

        Ok(Self {
            config,
            map,
            particles,
            motion_model,
            sensor_model,
            resampler,
            rng,
            trace: Box::new(NoopTrace),
            state: ParticleFilterState::default(),
        })
    }

    /// Attach a trace sink.
    pub fn with_trace<T: TraceSink + 'static>(mut self, trace: T) -> Self {
        self.trace = Box::new(trace);
        self
    }

    /// Replace the trace sink.
    pub fn set_trace(&mut self, trace: Box<dyn TraceSink>) {
        self.trace = trace;
    }

    /// Spread particles over cell centers, heading 0.
    ///
    /// Every cell gets `num_particles / cells`; the remainder goes to
    /// uniformly drawn cells.
    fn initialize_particles(num_particles: usize, map: &GridMap, rng: &mut R) -> Vec<Particle> {
        let at_cell = |row: usize, col: usize| {
            let center = map.cell_center(row, col);
            Particle::new(Pose::new(center.x, center.y, 0.0))
        };

        let base = num_particles / map.cell_count();
        let mut particles = Vec::with_capacity(num_particles);

        for row in 0..map.rows() {
            for col in 0..map.cols() {
                particles.extend(std::iter::repeat_n(at_cell(row, col), base));
            }
        }

        while particles.len() < num_particles {
            let row = rng.gen_range(0..map.rows());
            let col = rng.gen_range(0..map.cols());
            particles.push(at_cell(row, col));
        }

        particles
    }

    /// Get the configuration.
    pub fn config(&self) -> &ParticleFilterConfig {
        &self.config
    }

    /// Get the map.
    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }

    /// Get current particles (for visualization).
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Get current filter state (for diagnostics).
    pub fn state(&self) -> &ParticleFilterState {
        &self.state
    }

    /// Get the number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Get the sensor model.
    pub fn sensor_model(&self) -> &BeamConeModel {
        &self.sensor_model
    }

    /// Smoothed wheel powers applied on the last prediction.
    pub fn applied_powers(&self) -> MotionStep {
        self.motion_model.applied()
    }

    /// Prediction step: move every particle by a wheel-power command.
    pub fn predict(&mut self, left: f64, right: f64) {
        let step = self.motion_model.advance(left, right);

        for particle in &mut self.particles {
            particle.pose = self
                .motion_model
                .sample(&particle.pose, &step, &mut self.rng);
        }

        self.trace.record(TracePhase::Motion, &self.particles);
    }

    /// Update step: weight particles against one distance per beam and
    /// resample.
    ///
    /// Distances are in maze units. Infinite values are read as max range;
    /// NaN or negative values are rejected and leave the filter untouched.
    pub fn update(&mut self, distances: &[f64]) -> Result<()> {
        let observed = self.validate_reading(distances)?;
        self.state.iterations += 1;

        let (weights, distinct_poses) = self.compute_weights(&observed);

        let total: f64 = weights.iter().sum();
        let sum_sq: f64 = weights.iter().map(|w| (w / total) * (w / total)).sum();
        self.state.neff = if sum_sq > 1e-12 { 1.0 / sum_sq } else { 0.0 };
        self.state.max_weight = weights.iter().copied().fold(0.0, f64::max);
        self.state.distinct_poses = distinct_poses;

        self.particles = self
            .resampler
            .resample(&self.particles, &weights, &mut self.rng);
        self.apply_jitter();

        log::debug!(
            "Update {}: {} distinct poses, neff {:.1}, max weight {:.3}",
            self.state.iterations,
            distinct_poses,
            self.state.neff,
            self.state.max_weight
        );

        self.trace.record(TracePhase::Measurement, &self.particles);
        Ok(())
    }

    fn validate_reading(&self, distances: &[f64]) -> Result<Vec<f64>> {
        let expected = self.sensor_model.beam_count();
        if distances.len() != expected {
            return Err(Error::BeamCountMismatch {
                expected,
                actual: distances.len(),
            });
        }

        if let Some((beam, d)) = distances
            .iter()
            .enumerate()
            .find(|(_, d)| d.is_nan() || **d < 0.0)
        {
            return Err(Error::InvalidReading(format!("beam {} reported {}", beam, d)));
        }

        let max_range = self.sensor_model.config().max_range;
        Ok(distances.iter().map(|d| d.min(max_range)).collect())
    }

    /// Weight every particle, evaluating each distinct pose once.
    fn compute_weights(&self, observed: &[f64]) -> (Vec<f64>, usize) {
        let distinct = DistinctPoses::from_particles(&self.particles);
        let model = &self.sensor_model;
        let map = self.map.as_ref();

        let pose_weights: Vec<f64> = if model.config().parallel {
            distinct
                .poses
                .par_iter()
                .map(|pose| model.weight(pose, observed, map))
                .collect()
        } else {
            distinct
                .poses
                .iter()
                .map(|pose| model.weight(pose, observed, map))
                .collect()
        };

        let weights = distinct.index.iter().map(|&i| pose_weights[i]).collect();
        (weights, distinct.len())
    }

    fn apply_jitter(&mut self) {
        let (sigma_xy, sigma_theta) = (self.config.jitter_xy, self.config.jitter_theta);
        if sigma_xy <= 0.0 && sigma_theta <= 0.0 {
            return;
        }

        for particle in &mut self.particles {
            let dx: f64 = self.rng.sample(StandardNormal);
            let dy: f64 = self.rng.sample(StandardNormal);
            let dt: f64 = self.rng.sample(StandardNormal);
            let p = particle.pose;
            particle.pose = Pose::new(
                p.x + dx * sigma_xy,
                p.y + dy * sigma_xy,
                p.theta + dt * sigma_theta,
            );
        }
    }

    /// Get the estimated pose (most frequent particle pose).
    pub fn estimate(&self) -> Pose {
        estimate_mode(&self.particles).unwrap_or_default()
    }

    /// Mean particle position with circular-mean heading.
    pub fn mean_pose(&self) -> Pose {
        mean_pose(&self.particles).unwrap_or_default()
    }

    /// Restart global localization.
    ///
    /// Re-spreads particles over every cell and forgets actuator history
    /// and diagnostics.
    pub fn reset(&mut self) {
        self.particles = Self::initialize_particles(self.config.num_particles, &self.map, &mut self.rng);
        self.motion_model.reset();
        self.state = ParticleFilterState::default();
    }
}
