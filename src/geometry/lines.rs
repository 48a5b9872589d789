use geo::Coord;

use super::vectors::{cross, get_angle, perpendicular_normalized_vector_to_straight_line, vector};
use crate::error::{Result, TrackError};

/// Angle in degrees within which a point still counts as lying along a line
pub const DEFAULT_TOLERATED_ANGLE: f64 = 5.0;

/// Outcome of intersecting two infinite lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// The lines meet in a single point, rounded to three decimal places
    Point(Coord<f64>),
    /// The lines are parallel (or coincide), so there is no unique intersection
    Parallel,
}

impl Crossing {
    /// The crossing as a plain coordinate, with `(+inf, +inf)` standing in for parallel lines
    pub fn to_coord(self) -> Coord<f64> {
        match self {
            Crossing::Point(point) => point,
            Crossing::Parallel => Coord {
                x: f64::INFINITY,
                y: f64::INFINITY,
            },
        }
    }

    pub fn point(self) -> Option<Coord<f64>> {
        match self {
            Crossing::Point(point) => Some(point),
            Crossing::Parallel => None,
        }
    }
}

/// Intersect the line through `l1_p1`, `l1_p2` with the line through `l2_p1`, `l2_p2`
///
/// # Algorithm
/// 1. Lift the four points to homogeneous coordinates `(x, y, 1)`
/// 2. Each line is the cross product of its two points
/// 3. The intersection is the cross product of the two lines
/// 4. A zero homogeneous `z` means the lines are parallel; otherwise divide by `z`
pub fn crossing_point_for_two_lines(
    l1_p1: Coord<f64>,
    l1_p2: Coord<f64>,
    l2_p1: Coord<f64>,
    l2_p2: Coord<f64>,
) -> Crossing {
    let homogeneous = |p: Coord<f64>| [p.x, p.y, 1.0];

    let l1 = cross(homogeneous(l1_p1), homogeneous(l1_p2));
    let l2 = cross(homogeneous(l2_p1), homogeneous(l2_p2));
    let [x, y, z] = cross(l1, l2);

    if z == 0.0 {
        return Crossing::Parallel;
    }

    Crossing::Point(Coord {
        x: round3(x / z),
        y: round3(y / z),
    })
}

/// Slope `a` and intercept `b` of the line `y = a * x + b` through `p1` and `p2`
///
/// # Errors
/// * `TrackError::VerticalLine` - if both points share the same x
pub fn get_a_and_b_for_line(p1: Coord<f64>, p2: Coord<f64>) -> Result<(f64, f64)> {
    let dx = p1.x - p2.x;
    if dx == 0.0 {
        return Err(TrackError::VerticalLine { x: p1.x });
    }
    let a = (p1.y - p2.y) / dx;
    let b = p2.y - a * p2.x;
    Ok((a, b))
}

/// Foot of the perpendicular dropped from `p` onto the line through `l1_p1` and `l1_p2`
///
/// # Errors
/// * `TrackError::DegenerateVector` - if `l1_p1` and `l1_p2` coincide
pub fn get_a_point_on_a_line_closest_to_point(
    l1_p1: Coord<f64>,
    l1_p2: Coord<f64>,
    p: Coord<f64>,
) -> Result<Crossing> {
    let normal = perpendicular_normalized_vector_to_straight_line(vector(l1_p1, l1_p2))?;
    let p2 = p + normal;
    Ok(crossing_point_for_two_lines(l1_p1, l1_p2, p, p2))
}

/// Check that `p` lies within `tolerated_angle` degrees of the line from both ends
///
/// Seen from `lp1` the point must sit within the tolerance of the direction to `lp2`,
/// and seen from `lp2` within the tolerance of the direction to `lp1`. Together this
/// confines `p` to a narrow lens around the segment between the two points.
/// Angles are compared by magnitude against `tolerated_angle`, so either side of the
/// line counts the same. The check from `lp2` compares `vector(lp2, lp1)` with
/// `vector(lp2, p)`; comparing `vector(lp2, p)` with itself would always pass.
pub fn is_point_roughly_on_the_line(
    lp1: Coord<f64>,
    lp2: Coord<f64>,
    p: Coord<f64>,
    tolerated_angle: f64,
) -> bool {
    let a1 = get_angle(vector(lp1, lp2), vector(lp1, p));
    let a2 = get_angle(vector(lp2, lp1), vector(lp2, p));
    a1.abs() < tolerated_angle && a2.abs() < tolerated_angle
}

/// Round half to even at three decimal places
fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_crossing_of_axes_is_origin() {
        let crossing = crossing_point_for_two_lines(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 1.0 },
        );
        assert_eq!(crossing, Crossing::Point(coord! { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn test_parallel_lines_return_sentinel() {
        let crossing = crossing_point_for_two_lines(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 0.0, y: 1.0 },
            coord! { x: 1.0, y: 2.0 },
        );
        assert_eq!(crossing, Crossing::Parallel);
        assert!(crossing.point().is_none());

        let sentinel = crossing.to_coord();
        assert_eq!(sentinel.x, f64::INFINITY);
        assert_eq!(sentinel.y, f64::INFINITY);
    }

    #[test]
    fn test_crossing_is_rounded_to_three_decimals() {
        // y = x and y = -x + 2/3 meet at (1/3, 1/3)
        let crossing = crossing_point_for_two_lines(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 3.0, y: 3.0 },
            coord! { x: 0.0, y: 2.0 / 3.0 },
            coord! { x: 2.0 / 3.0, y: 0.0 },
        );
        assert_eq!(crossing.to_coord(), coord! { x: 0.333, y: 0.333 });
    }

    #[test]
    fn test_round3_ties_to_even() {
        assert_eq!(round3(0.0625), 0.062);
        assert_eq!(round3(-1.5), -1.5);
        assert_eq!(round3(2.0004), 2.0);
    }

    #[test]
    fn test_a_and_b_for_line() {
        let (a, b) = get_a_and_b_for_line(coord! { x: 1.0, y: 3.0 }, coord! { x: 3.0, y: 7.0 }).unwrap();
        assert_eq!(a, 2.0);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_a_and_b_for_vertical_line_fails() {
        let result = get_a_and_b_for_line(coord! { x: 2.0, y: 0.0 }, coord! { x: 2.0, y: 5.0 });
        assert!(matches!(result, Err(TrackError::VerticalLine { x }) if x == 2.0));
    }

    #[test]
    fn test_closest_point_on_horizontal_line() {
        let crossing = get_a_point_on_a_line_closest_to_point(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 10.0, y: 0.0 },
            coord! { x: 5.0, y: 5.0 },
        )
        .unwrap();
        assert_eq!(crossing, Crossing::Point(coord! { x: 5.0, y: 0.0 }));
    }

    #[test]
    fn test_closest_point_on_diagonal_line() {
        let crossing = get_a_point_on_a_line_closest_to_point(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 4.0, y: 4.0 },
            coord! { x: 0.0, y: 2.0 },
        )
        .unwrap();
        assert_eq!(crossing.to_coord(), coord! { x: 1.0, y: 1.0 });
    }

    #[test]
    fn test_closest_point_on_degenerate_line_fails() {
        let p = coord! { x: 1.0, y: 1.0 };
        let result = get_a_point_on_a_line_closest_to_point(p, p, coord! { x: 3.0, y: 0.0 });
        assert!(matches!(result, Err(TrackError::DegenerateVector)));
    }

    #[test]
    fn test_point_roughly_on_the_line() {
        let lp1 = coord! { x: 0.0, y: 0.0 };
        let lp2 = coord! { x: 100.0, y: 0.0 };

        assert!(is_point_roughly_on_the_line(lp1, lp2, coord! { x: 50.0, y: 0.0 }, DEFAULT_TOLERATED_ANGLE));
        assert!(is_point_roughly_on_the_line(lp1, lp2, coord! { x: 50.0, y: 2.0 }, DEFAULT_TOLERATED_ANGLE));
        assert!(is_point_roughly_on_the_line(lp1, lp2, coord! { x: 50.0, y: -2.0 }, DEFAULT_TOLERATED_ANGLE));
        assert!(!is_point_roughly_on_the_line(lp1, lp2, coord! { x: 50.0, y: 20.0 }, DEFAULT_TOLERATED_ANGLE));
    }

    #[test]
    fn test_point_beyond_segment_end_is_rejected() {
        let lp1 = coord! { x: 0.0, y: 0.0 };
        let lp2 = coord! { x: 100.0, y: 0.0 };

        // Collinear, but behind lp2 when seen from lp2
        assert!(!is_point_roughly_on_the_line(lp1, lp2, coord! { x: 150.0, y: 0.0 }, DEFAULT_TOLERATED_ANGLE));
        assert!(!is_point_roughly_on_the_line(lp1, lp2, coord! { x: -50.0, y: 0.0 }, DEFAULT_TOLERATED_ANGLE));
    }

    #[test]
    fn test_tolerated_angle_is_respected() {
        let lp1 = coord! { x: 0.0, y: 0.0 };
        let lp2 = coord! { x: 100.0, y: 0.0 };
        let p = coord! { x: 50.0, y: 10.0 };

        assert!(!is_point_roughly_on_the_line(lp1, lp2, p, DEFAULT_TOLERATED_ANGLE));
        assert!(is_point_roughly_on_the_line(lp1, lp2, p, 15.0));
    }
}
