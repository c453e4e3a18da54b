//! Localization module.
//!
//! Provides Monte Carlo Localization (MCL) for robot pose estimation
//! within a known maze.
//!
//! # Components
//!
//! - [`MotionModel`]: Wheel-power motion model with actuator lag and noise
//! - [`SensorModel`]: Beam-cone ranging model for the IR sensors
//! - [`Resampler`]: Systematic or multinomial importance resampling
//! - [`ParticleFilter`]: Full MCL loop with mode estimate
//!
//! # Example
//!
//! ```ignore
//! use maze_mcl::algorithms::localization::{ParticleFilter, ParticleFilterConfig};
//!
//! let mut filter = ParticleFilter::from_seed(ParticleFilterConfig::default(), map)?;
//!
//! // Predict step with the wheel command just sent
//! filter.predict(0.1, 0.1);
//!
//! // Update step with one distance per beam
//! filter.update(&[1.2, 0.8, 0.9, 3.0])?;
//!
//! // Get most likely pose
//! let pose = filter.estimate();
//! ```

mod estimator;
mod motion_model;
mod particle_filter;
mod resampler;
mod sensor_model;
pub mod trace;

pub use estimator::{DistinctPoses, estimate_mode, mean_pose};
pub use motion_model::{MotionModel, MotionModelConfig, MotionStep};
pub use particle_filter::{Particle, ParticleFilter, ParticleFilterConfig, ParticleFilterState};
pub use resampler::{Resampler, ResamplingStrategy};
pub use sensor_model::{BeamConeModel, ConeMode, SensorModel, SensorModelConfig};
pub use trace::{NoopTrace, TracePhase, TraceSink, WriterTrace};
