//! Core data types for maze localization.
//!
//! - [`Point2D`]: 2D point in maze units
//! - [`Pose`]: Robot pose (x, y, theta) with theta in degrees

mod pose;

pub use pose::{Point2D, Pose, PoseKey};
