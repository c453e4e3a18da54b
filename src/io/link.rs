//! Boundary to the robot: sensor readings in, motor commands out.

use crate::error::Result;

/// One sensor reading from the robot.
///
/// IR values are raw inverse distances, one per beam in the order the
/// sensor model lists its beams. The status flags are for the controller;
/// the filter only consumes the IR values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorFrame {
    /// Raw IR values (1 / distance). 0 means nothing in range.
    pub ir: Vec<f64>,
    /// Start signal received.
    pub start: bool,
    /// Stop signal received.
    pub stop: bool,
    /// Robot bumped into a wall since the last command.
    pub collision: bool,
    /// Ground marker under the robot, if any.
    pub ground: Option<u32>,
}

impl SensorFrame {
    /// Convert the IR values to distances clamped to `max_range`.
    pub fn distances(&self, max_range: f64) -> Vec<f64> {
        self.ir.iter().map(|&raw| raw_to_distance(raw, max_range)).collect()
    }
}

/// Convert a raw inverse-distance IR value to a distance.
///
/// Zero, negative and non-finite values mean no obstacle in range and map to
/// `max_range`.
///
/// # Example
/// ```
/// use maze_mcl::io::link::raw_to_distance;
///
/// assert_eq!(raw_to_distance(2.0, 10.0), 0.5);
/// assert_eq!(raw_to_distance(0.0, 10.0), 10.0);
/// ```
#[inline]
pub fn raw_to_distance(raw: f64, max_range: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return max_range;
    }
    (1.0 / raw).min(max_range)
}

/// Connection to a robot or simulator.
pub trait RobotLink {
    /// Read the latest sensor frame.
    fn read_sensors(&mut self) -> Result<SensorFrame>;

    /// Command left and right wheel power, each in [-1, 1].
    fn drive_motors(&mut self, left: f64, right: f64) -> Result<()>;
}

impl<L: RobotLink + ?Sized> RobotLink for Box<L> {
    fn read_sensors(&mut self) -> Result<SensorFrame> {
        (**self).read_sensors()
    }

    fn drive_motors(&mut self, left: f64, right: f64) -> Result<()> {
        (**self).drive_motors(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_to_distance() {
        assert_eq!(raw_to_distance(4.0, 10.0), 0.25);
        assert_eq!(raw_to_distance(0.05, 10.0), 10.0);
        assert_eq!(raw_to_distance(0.0, 10.0), 10.0);
        assert_eq!(raw_to_distance(-1.0, 10.0), 10.0);
        assert_eq!(raw_to_distance(f64::NAN, 10.0), 10.0);
        assert_eq!(raw_to_distance(f64::INFINITY, 10.0), 10.0);
    }

    #[test]
    fn test_frame_distances() {
        let frame = SensorFrame {
            ir: vec![2.0, 0.0, 1.0, 0.5],
            ..Default::default()
        };
        assert_eq!(frame.distances(5.0), vec![0.5, 5.0, 1.0, 2.0]);
    }
}
