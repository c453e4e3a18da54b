//! Ray and cone casting against maze walls.
//!
//! Computes the distance from a sensor to the nearest wall, either along a
//! single ray or anywhere inside a sensing cone.

use super::grid_map::Wall;
use crate::core::types::Point2D;

/// Cast a ray and return the distance to the first wall hit.
///
/// # Arguments
/// * `origin` - Ray origin in world frame
/// * `direction` - Ray direction (will be normalized)
/// * `max_range` - Maximum ray distance
/// * `walls` - Map wall segments
///
/// # Returns
/// Distance to the first intersection, or `max_range` if none.
pub fn raycast(origin: Point2D, direction: Point2D, max_range: f64, walls: &[Wall]) -> f64 {
    walls
        .iter()
        .filter_map(|wall| wall.ray_intersection(origin, direction))
        .fold(max_range, f64::min)
}

/// Nearest wall distance inside a cone, approximated by evenly spaced rays.
///
/// `rays` rays span `[heading - half_aperture, heading + half_aperture]`
/// (degrees), edges included. A single ray is cast along `heading`.
pub fn sampled_cone_distance(
    origin: Point2D,
    heading: f64,
    half_aperture: f64,
    rays: usize,
    max_range: f64,
    walls: &[Wall],
) -> f64 {
    if rays <= 1 || half_aperture <= 0.0 {
        return raycast(origin, Point2D::from_heading(heading), max_range, walls);
    }

    let step = 2.0 * half_aperture / (rays - 1) as f64;
    (0..rays)
        .map(|i| heading - half_aperture + step * i as f64)
        .map(|angle| raycast(origin, Point2D::from_heading(angle), max_range, walls))
        .fold(max_range, f64::min)
}

/// Exact nearest wall distance inside a cone.
///
/// The closest wall point inside the cone is always visible from the apex
/// (anything occluding it would itself be closer and inside the cone), so
/// the result is the minimum over walls of the distance from `origin` to the
/// part of each wall that lies within the cone.
///
/// Requires `half_aperture < 90` degrees so the cone is convex. Wider cones
/// fall back to [`sampled_cone_distance`] with one ray per degree.
pub fn cone_distance(
    origin: Point2D,
    heading: f64,
    half_aperture: f64,
    max_range: f64,
    walls: &[Wall],
) -> f64 {
    if half_aperture <= 0.0 {
        return raycast(origin, Point2D::from_heading(heading), max_range, walls);
    }
    if half_aperture >= 90.0 {
        let rays = (2.0 * half_aperture).ceil() as usize + 1;
        return sampled_cone_distance(origin, heading, half_aperture, rays, max_range, walls);
    }

    let left_edge = Point2D::from_heading(heading + half_aperture);
    let right_edge = Point2D::from_heading(heading - half_aperture);

    walls
        .iter()
        .filter_map(|wall| {
            // Inside the cone: counter-clockwise of the right edge and
            // clockwise of the left edge.
            let right_side = |p: Point2D| right_edge.cross(p - origin);
            let left_side = |p: Point2D| (p - origin).cross(left_edge);

            let span = clip_to_half_plane(right_side(wall.start), right_side(wall.end), (0.0, 1.0))?;
            let (t0, t1) = clip_to_half_plane(left_side(wall.start), left_side(wall.end), span)?;

            Some(point_segment_distance(origin, wall.point_at(t0), wall.point_at(t1)))
        })
        .fold(max_range, f64::min)
}

/// Restrict the parameter span `[t0, t1]` of a segment to where the linear
/// side function (`f_start` at t=0, `f_end` at t=1) is non-negative.
fn clip_to_half_plane(f_start: f64, f_end: f64, (t0, t1): (f64, f64)) -> Option<(f64, f64)> {
    const EPS: f64 = 1e-12;
    let inside_start = f_start >= -EPS;
    let inside_end = f_end >= -EPS;

    match (inside_start, inside_end) {
        (true, true) => Some((t0, t1)),
        (false, false) => None,
        _ => {
            let t = f_start / (f_start - f_end);
            let (t0, t1) = if inside_start {
                (t0, t1.min(t))
            } else {
                (t0.max(t), t1)
            };
            (t0 <= t1).then_some((t0, t1))
        }
    }
}

/// Distance from `p` to the segment `[a, b]`.
pub fn point_segment_distance(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < 1e-18 {
        return p.distance(&a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(&(a + ab * t))
}
