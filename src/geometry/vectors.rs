use geo::Coord;

use crate::error::{Result, TrackError};

/// Vector pointing from `p2` to `p1` (componentwise `p1 - p2`)
pub fn vector(p1: Coord<f64>, p2: Coord<f64>) -> Coord<f64> {
    p1 - p2
}

/// Signed angle in degrees from `v1` to `v2`
///
/// Uses `atan2(det([v1, v2]), dot(v1, v2))`, so the result lies in (-180, 180]
/// and is positive for a counter-clockwise rotation from `v1` to `v2`.
pub fn get_angle(v1: Coord<f64>, v2: Coord<f64>) -> f64 {
    let det = v1.x * v2.y - v1.y * v2.x;
    let dot = v1.x * v2.x + v1.y * v2.y;
    // -0.0 would send opposite vectors to -180
    (det + 0.0).atan2(dot).to_degrees()
}

/// Euclidean norm of `v`
pub fn get_vector_length(v: Coord<f64>) -> f64 {
    v.x.hypot(v.y)
}

/// Scale `v` to unit length
///
/// # Errors
/// * `TrackError::DegenerateVector` - if `v` has zero length
pub fn normalize_vector(v: Coord<f64>) -> Result<Coord<f64>> {
    let length = get_vector_length(v);
    if length == 0.0 {
        return Err(TrackError::DegenerateVector);
    }
    Ok(v / length)
}

/// Perpendicular of `v`, keeping its length
///
/// Computed as the planar part of `(v.x, v.y, 0) x (0, 0, -1)`, which is `(-v.y, v.x)`.
pub fn perpendicular_vector(v: Coord<f64>) -> Coord<f64> {
    let [x, y, _] = cross([v.x, v.y, 0.0], [0.0, 0.0, -1.0]);
    Coord { x, y }
}

/// Unit vector perpendicular to a line with direction `v`
///
/// # Errors
/// * `TrackError::DegenerateVector` - if `v` has zero length
pub fn perpendicular_normalized_vector_to_straight_line(v: Coord<f64>) -> Result<Coord<f64>> {
    normalize_vector(perpendicular_vector(v))
}

pub(crate) fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
