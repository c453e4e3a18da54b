//! Angle primitives for maze localization.
//!
//! Headings are carried in degrees throughout the crate and converted to
//! radians only at the trigonometry boundary.

/// Wrap an angle in degrees into the half-open range [-180, 180).
///
/// Values on the boundary map to -180, so `normalize_degrees(180.0)` and
/// `normalize_degrees(-180.0)` agree. Non-finite input yields NaN.
///
/// # Example
/// ```
/// use maze_mcl::core::math::normalize_degrees;
///
/// assert_eq!(normalize_degrees(190.0), -170.0);
/// assert_eq!(normalize_degrees(180.0), -180.0);
/// assert_eq!(normalize_degrees(-540.0), -180.0);
/// ```
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    if (-180.0..180.0).contains(&angle) {
        return angle;
    }
    if !angle.is_finite() {
        return f64::NAN;
    }
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 { -180.0 } else { wrapped }
}

/// Shortest signed difference from heading `a` to heading `b`, in degrees.
#[inline]
pub fn angle_diff_degrees(a: f64, b: f64) -> f64 {
    normalize_degrees(b - a)
}

/// Degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Radians to degrees.
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Circular mean of a set of headings in degrees.
///
/// Returns 0 for an empty input or when the headings cancel out exactly.
pub fn mean_heading_degrees<I: IntoIterator<Item = f64>>(headings: I) -> f64 {
    let (sum_sin, sum_cos) = headings
        .into_iter()
        .map(|h| deg_to_rad(h).sin_cos())
        .fold((0.0, 0.0), |(s, c), (sin, cos)| (s + sin, c + cos));

    if sum_sin.abs() < 1e-12 && sum_cos.abs() < 1e-12 {
        return 0.0;
    }
    normalize_degrees(rad_to_deg(sum_sin.atan2(sum_cos)))
}
