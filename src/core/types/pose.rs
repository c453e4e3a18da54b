//! Pose and point types for maze localization.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::core::math::{deg_to_rad, normalize_degrees};

/// A 2D point in maze units (one cell is 2 units wide).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `degrees`.
    #[inline]
    pub fn from_heading(degrees: f64) -> Self {
        let (sin, cos) = deg_to_rad(degrees).sin_cos();
        Self::new(cos, sin)
    }

    /// 2D cross product (z component).
    #[inline]
    pub fn cross(self, other: Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Vector length.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f64 {
        (*self - *other).length()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < f64::EPSILON {
            Self::default()
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scale: f64) -> Self {
        Point2D::new(self.x * scale, self.y * scale)
    }
}

/// Robot pose in the maze.
///
/// Position (x, y) is in maze units. Heading (theta) is in degrees,
/// counter-clockwise from +X and normalized to [-180, 180).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Heading in degrees, normalized to [-180, 180)
    pub theta: f64,
}

/// Exact bitwise identity of a pose, usable as a hash key.
///
/// `-0.0` and `0.0` produce the same key.
pub type PoseKey = [u64; 3];

impl Pose {
    /// Create a new pose with theta normalized to [-180, 180).
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: normalize_degrees(theta),
        }
    }

    /// Position component.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Point at `distance` from the pose center along `heading_offset`
    /// degrees relative to the pose heading.
    #[inline]
    pub fn offset_point(&self, heading_offset: f64, distance: f64) -> Point2D {
        self.position() + Point2D::from_heading(self.theta + heading_offset) * distance
    }

    /// Hash key identifying numerically equal poses.
    #[inline]
    pub fn key(&self) -> PoseKey {
        // Adding 0.0 folds -0.0 into 0.0
        [
            (self.x + 0.0).to_bits(),
            (self.y + 0.0).to_bits(),
            (self.theta + 0.0).to_bits(),
        ]
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pose_new_normalizes() {
        let pose = Pose::new(1.0, 2.0, 270.0);
        assert_relative_eq!(pose.theta, -90.0, epsilon = 1e-9);

        let pose = Pose::new(0.0, 0.0, 180.0);
        assert_eq!(pose.theta, -180.0);
    }

    #[test]
    fn test_offset_point() {
        let pose = Pose::new(1.0, 1.0, 90.0);
        let front = pose.offset_point(0.0, 0.5);
        assert_relative_eq!(front.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(front.y, 1.5, epsilon = 1e-12);

        let right = pose.offset_point(-90.0, 0.5);
        assert_relative_eq!(right.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(right.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_key_merges_signed_zero() {
        let a = Pose::new(0.0, -0.0, 0.0);
        let b = Pose::new(-0.0, 0.0, -0.0);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), Pose::new(0.0, 0.0, 1.0).key());
    }

    #[test]
    fn test_point_ops() {
        let a = Point2D::new(3.0, 4.0);
        assert_relative_eq!(a.length(), 5.0);
        assert_relative_eq!(a.normalized().x, 0.6);
        assert_relative_eq!(a.cross(Point2D::new(1.0, 0.0)), -4.0);
        assert_eq!(Point2D::default().normalized(), Point2D::default());
        assert_relative_eq!(a.distance(&Point2D::new(0.0, 0.0)), 5.0);
    }
}
