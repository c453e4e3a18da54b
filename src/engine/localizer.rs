//! Robot-facing localization loop.

use rand::Rng;
use rand::rngs::SmallRng;

use crate::algorithms::localization::ParticleFilter;
use crate::core::types::Pose;
use crate::error::Result;
use crate::io::link::{RobotLink, SensorFrame};

/// Particle filter wired to a robot link.
///
/// `drive` sends a command to the robot and predicts with it; `sense` reads
/// the robot and updates with it. Link failures are returned to the caller
/// without touching the filter.
pub struct MazeLocalizer<L: RobotLink, R: Rng = SmallRng> {
    filter: ParticleFilter<R>,
    link: L,
}

impl<L: RobotLink, R: Rng> MazeLocalizer<L, R> {
    /// Combine a filter and a link.
    pub fn new(filter: ParticleFilter<R>, link: L) -> Self {
        Self { filter, link }
    }

    /// Command wheel powers and predict with them.
    pub fn drive(&mut self, left: f64, right: f64) -> Result<()> {
        self.link.drive_motors(left, right)?;
        self.filter.predict(left, right);
        Ok(())
    }

    /// Read the sensors and update the filter.
    ///
    /// Returns the frame so the caller can act on its status flags.
    pub fn sense(&mut self) -> Result<SensorFrame> {
        let frame = self.link.read_sensors()?;
        let max_range = self.filter.sensor_model().config().max_range;
        self.filter.update(&frame.distances(max_range))?;
        Ok(frame)
    }

    /// Drive then sense, the usual control cycle.
    pub fn step(&mut self, left: f64, right: f64) -> Result<SensorFrame> {
        self.drive(left, right)?;
        self.sense()
    }

    /// Most likely pose.
    pub fn estimate(&self) -> Pose {
        self.filter.estimate()
    }

    /// Get the filter.
    pub fn filter(&self) -> &ParticleFilter<R> {
        &self.filter
    }

    /// Get the filter mutably (for reset or trace changes).
    pub fn filter_mut(&mut self) -> &mut ParticleFilter<R> {
        &mut self.filter
    }

    /// Get the link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Get the link mutably.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Split into filter and link.
    pub fn into_parts(self) -> (ParticleFilter<R>, L) {
        (self.filter, self.link)
    }
}
