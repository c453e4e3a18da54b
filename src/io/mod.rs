//! I/O and infrastructure layer.
//!
//! This layer handles the connection to the robot.
//!
//! # Contents
//!
//! - [`link`]: Sensor/actuator boundary and raw IR conversion
//! - [`simulated`]: In-process simulated maze implementing the link
//! - [`noise`]: Seeded IR noise for the simulation

pub mod link;
pub mod noise;
pub mod simulated;

// Re-export common types
pub use link::{RobotLink, SensorFrame, raw_to_distance};
pub use simulated::{CollisionMode, SimulatedMaze, SimulationConfig};
