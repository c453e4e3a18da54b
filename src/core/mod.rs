//! Core foundation layer.
//!
//! Bottom layer of the crate with no internal dependencies.
//!
//! # Contents
//!
//! - [`types`]: Pose and point types
//! - [`math`]: Angle normalization and unit conversion

pub mod math;
pub mod types;
