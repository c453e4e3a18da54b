//! Core algorithms.
//!
//! - [`mapping`]: Maze wall grid and ray casting
//! - [`localization`]: Monte Carlo localization (particle filter)

pub mod localization;
pub mod mapping;
