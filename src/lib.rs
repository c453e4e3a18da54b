//! maze-mcl - Monte Carlo localization for a differential-drive robot in a
//! grid maze
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │                 (MazeLocalizer)                     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Infrastructure
//! │          (robot link, simulated maze)               │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │              (mapping, localization)                │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (types, math)                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Coordinates
//!
//! One maze cell is a 2x2 square; cell `(row, col)` is centered at
//! `(2*col + 1, 2*row + 1)` with row 0 at the bottom. Headings are degrees,
//! counter-clockwise from +X, kept in `[-180, 180)`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use maze_mcl::{GridMap, ParticleFilter, ParticleFilterConfig};
//!
//! let map = Arc::new(GridMap::empty(2, 3)?);
//! let config = ParticleFilterConfig { num_particles: 60, seed: 7, ..Default::default() };
//! let mut filter = ParticleFilter::from_seed(config, map)?;
//!
//! filter.predict(0.1, 0.1);
//! filter.update(&[1.5, 0.9, 0.9, 0.5])?;
//! let pose = filter.estimate();
//! assert!(pose.theta >= -180.0 && pose.theta < 180.0);
//! # Ok::<(), maze_mcl::Error>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod io;

pub use algorithms::localization::{
    MotionModelConfig, ParticleFilter, ParticleFilterConfig, SensorModelConfig,
};
pub use algorithms::mapping::{GridMap, WallSegment};
pub use config::{MapConfig, MclConfig};
pub use core::types::{Point2D, Pose};
pub use engine::MazeLocalizer;
pub use error::{Error, Result};
pub use io::{RobotLink, SensorFrame, SimulatedMaze, SimulationConfig};
