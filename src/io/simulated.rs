//! In-process simulated maze.
//!
//! A [`RobotLink`] that keeps a ground-truth pose inside a [`GridMap`].
//! Motor commands move the robot with the same lagged kinematics the filter
//! assumes; sensor reads report the beam-cone distance to the nearest wall
//! as raw inverse-distance IR values, with optional noise and dropouts.

use std::sync::Arc;

use serde::Deserialize;

use crate::algorithms::localization::{
    BeamConeModel, MotionModel, MotionModelConfig, ParticleFilterConfig,
};
use crate::algorithms::mapping::{GridMap, point_segment_distance};
use crate::core::types::Pose;
use crate::error::{Error, Result};

use super::link::{RobotLink, SensorFrame};
use super::noise::IrNoise;

/// Collision handling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Keep the position, still apply the rotation
    #[default]
    Stop,
    /// Walk through walls (for debugging)
    Passthrough,
}

/// Simulation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial true X position
    pub start_x: f64,
    /// Initial true Y position
    pub start_y: f64,
    /// Initial true heading (degrees)
    pub start_theta: f64,

    /// Random seed (0 = entropy)
    pub seed: u64,

    /// Per-wheel multiplicative noise on executed commands
    pub motion_noise: f64,
    /// Additive Gaussian noise on reported distances
    pub range_noise: f64,
    /// Probability that a beam reports nothing (raw 0)
    pub dropout_rate: f64,

    /// What happens when the body would enter a wall
    pub collision: CollisionMode,

    /// Cell reported through the ground sensor, as (row, col)
    pub goal_cell: Option<(usize, usize)>,

    /// Number of command cycles the demo runs
    pub steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_x: 1.0,
            start_y: 1.0,
            start_theta: 0.0,
            seed: 0,
            motion_noise: 0.015,
            range_noise: 0.05,
            dropout_rate: 0.0,
            collision: CollisionMode::Stop,
            goal_cell: None,
            steps: 200,
        }
    }
}

impl SimulationConfig {
    /// Noise-free simulation starting at `pose`.
    pub fn exact(pose: Pose) -> Self {
        Self {
            start_x: pose.x,
            start_y: pose.y,
            start_theta: pose.theta,
            seed: 1,
            motion_noise: 0.0,
            range_noise: 0.0,
            ..Default::default()
        }
    }

    /// Initial true pose.
    pub fn start_pose(&self) -> Pose {
        Pose::new(self.start_x, self.start_y, self.start_theta)
    }

    /// Check the parameters against a map.
    pub fn validate(&self, map: &GridMap) -> Result<()> {
        let start = self.start_pose();
        if !start.theta.is_finite() || map.cell_at(start.position()).is_none() {
            return Err(Error::Config(format!(
                "simulation start ({}, {}, {}) is outside the {}x{} maze",
                self.start_x,
                self.start_y,
                self.start_theta,
                map.rows(),
                map.cols()
            )));
        }
        for (name, value) in [("motion_noise", self.motion_noise), ("range_noise", self.range_noise)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "simulation.{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.dropout_rate) {
            return Err(Error::Config(format!(
                "simulation.dropout_rate must be in [0, 1], got {}",
                self.dropout_rate
            )));
        }
        if let Some((row, col)) = self.goal_cell {
            if row >= map.rows() || col >= map.cols() {
                return Err(Error::Config(format!(
                    "simulation.goal_cell ({}, {}) is outside the maze",
                    row, col
                )));
            }
        }
        Ok(())
    }
}

/// Simulated robot in a known maze.
#[derive(Debug)]
pub struct SimulatedMaze {
    map: Arc<GridMap>,
    config: SimulationConfig,
    pose: Pose,
    radius: f64,
    motion: MotionModel,
    sensors: BeamConeModel,
    noise: IrNoise,
    collided: bool,
    collisions: u64,
}

impl SimulatedMaze {
    /// Create a simulation using the robot geometry of `filter`.
    pub fn new(map: Arc<GridMap>, filter: &ParticleFilterConfig, config: SimulationConfig) -> Result<Self> {
        filter.validate()?;
        config.validate(&map)?;

        let motion_config = MotionModelConfig {
            noise_stddev: config.motion_noise,
            ..filter.motion
        };

        Ok(Self {
            pose: config.start_pose(),
            radius: filter.diameter / 2.0,
            motion: MotionModel::new(motion_config, filter.diameter),
            sensors: BeamConeModel::new(filter.sensor.clone(), filter.diameter),
            noise: IrNoise::new(config.seed, config.range_noise, config.dropout_rate),
            map,
            config,
            collided: false,
            collisions: 0,
        })
    }

    /// Ground-truth pose.
    pub fn true_pose(&self) -> Pose {
        self.pose
    }

    /// Teleport the robot.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Number of blocked moves so far.
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Get the map.
    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }

    fn touches_wall(&self, pose: &Pose) -> bool {
        let center = pose.position();
        self.map
            .walls()
            .iter()
            .any(|wall| point_segment_distance(center, wall.start, wall.end) < self.radius)
    }

    fn at_goal(&self) -> Option<u32> {
        let (row, col) = self.config.goal_cell?;
        (self.map.cell_at(self.pose.position()) == Some((row, col))).then_some(0)
    }
}

impl RobotLink for SimulatedMaze {
    fn read_sensors(&mut self) -> Result<SensorFrame> {
        let max_range = self.sensors.config().max_range;
        let mut ir = Vec::with_capacity(self.sensors.config().beam_count());

        for &beam in &self.sensors.config().beam_angles {
            let distance = self.sensors.expected_range(&self.pose, beam, &self.map);
            ir.push(self.noise.ir_reading(distance, max_range));
        }

        let frame = SensorFrame {
            ir,
            start: true,
            stop: false,
            collision: self.collided,
            ground: self.at_goal(),
        };
        log::trace!("Simulated frame at {:?}: {:?}", self.pose, frame.ir);
        Ok(frame)
    }

    fn drive_motors(&mut self, left: f64, right: f64) -> Result<()> {
        if !left.is_finite() || !right.is_finite() {
            return Err(Error::Link(format!(
                "wheel powers must be finite, got ({}, {})",
                left, right
            )));
        }

        let step = self.motion.advance(left, right);
        let next = self.motion.sample(&self.pose, &step, self.noise.rng_mut());

        self.collided = self.config.collision == CollisionMode::Stop && self.touches_wall(&next);
        if self.collided {
            // Don't update position, only rotation
            self.pose = Pose::new(self.pose.x, self.pose.y, next.theta);
            self.collisions += 1;
            log::debug!("Simulated robot blocked at ({:.2}, {:.2})", self.pose.x, self.pose.y);
        } else {
            self.pose = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::link::raw_to_distance;
    use approx::assert_relative_eq;

    fn corridor() -> Arc<GridMap> {
        Arc::new(GridMap::empty(1, 4).unwrap())
    }

    #[test]
    fn test_exact_readings_match_sensor_model() {
        let map = corridor();
        let filter = ParticleFilterConfig::default();
        let mut sim = SimulatedMaze::new(map.clone(), &filter, SimulationConfig::exact(Pose::new(1.0, 1.0, 0.0))).unwrap();

        let frame = sim.read_sensors().unwrap();
        let distances = frame.distances(filter.sensor.max_range);

        // Front cone edges reach the side walls before the far end
        assert_relative_eq!(distances[0], 2.0, epsilon = 1e-9);
        // Rear beam sees the wall right behind
        assert_relative_eq!(distances[3], 0.5, epsilon = 1e-9);
        assert!(frame.start);
        assert!(!frame.collision);
    }

    #[test]
    fn test_drive_moves_true_pose() {
        let filter = ParticleFilterConfig::default();
        let mut sim = SimulatedMaze::new(corridor(), &filter, SimulationConfig::exact(Pose::new(1.0, 1.0, 0.0))).unwrap();

        sim.drive_motors(0.1, 0.1).unwrap();
        assert_relative_eq!(sim.true_pose().x, 1.05, epsilon = 1e-12);
        sim.drive_motors(0.1, 0.1).unwrap();
        assert_relative_eq!(sim.true_pose().x, 1.125, epsilon = 1e-12);
    }

    #[test]
    fn test_wall_blocks_motion() {
        let filter = ParticleFilterConfig::default();
        let mut sim = SimulatedMaze::new(corridor(), &filter, SimulationConfig::exact(Pose::new(1.0, 1.0, 180.0))).unwrap();

        // Backing into the left end wall: radius 0.5, wall 1.0 away
        for _ in 0..20 {
            sim.drive_motors(0.2, 0.2).unwrap();
        }

        assert!(sim.collisions() > 0);
        assert!(sim.true_pose().x >= 0.5);
        assert!(sim.read_sensors().unwrap().collision);
    }

    #[test]
    fn test_passthrough_ignores_walls() {
        let filter = ParticleFilterConfig::default();
        let config = SimulationConfig {
            collision: CollisionMode::Passthrough,
            ..SimulationConfig::exact(Pose::new(1.0, 1.0, 180.0))
        };
        let mut sim = SimulatedMaze::new(corridor(), &filter, config).unwrap();

        for _ in 0..20 {
            sim.drive_motors(0.2, 0.2).unwrap();
        }
        assert_eq!(sim.collisions(), 0);
        assert!(sim.true_pose().x < 0.0);
    }

    #[test]
    fn test_dropout_reports_zero() {
        let filter = ParticleFilterConfig::default();
        let config = SimulationConfig {
            dropout_rate: 1.0,
            ..SimulationConfig::exact(Pose::new(1.0, 1.0, 0.0))
        };
        let mut sim = SimulatedMaze::new(corridor(), &filter, config).unwrap();

        let frame = sim.read_sensors().unwrap();
        assert!(frame.ir.iter().all(|&raw| raw == 0.0));
        assert_eq!(raw_to_distance(frame.ir[0], 10.0), 10.0);
    }

    #[test]
    fn test_goal_cell_ground_sensor() {
        let filter = ParticleFilterConfig::default();
        let config = SimulationConfig {
            goal_cell: Some((0, 0)),
            ..SimulationConfig::exact(Pose::new(1.0, 1.0, 0.0))
        };
        let mut sim = SimulatedMaze::new(corridor(), &filter, config).unwrap();
        assert_eq!(sim.read_sensors().unwrap().ground, Some(0));

        sim.set_pose(Pose::new(5.0, 1.0, 0.0));
        assert_eq!(sim.read_sensors().unwrap().ground, None);
    }

    #[test]
    fn test_non_finite_command_is_link_error() {
        let filter = ParticleFilterConfig::default();
        let mut sim = SimulatedMaze::new(corridor(), &filter, SimulationConfig::exact(Pose::new(1.0, 1.0, 0.0))).unwrap();
        assert!(matches!(sim.drive_motors(f64::NAN, 0.0), Err(Error::Link(_))));
    }

    #[test]
    fn test_start_outside_maze_rejected() {
        let filter = ParticleFilterConfig::default();
        let result = SimulatedMaze::new(corridor(), &filter, SimulationConfig::exact(Pose::new(20.0, 1.0, 0.0)));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
