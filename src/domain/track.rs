use geo::{Area, Coord, LineString, Polygon};

use super::waypoint::{Waypoint, waypoints_from_flat, waypoints_from_records};
use crate::error::Result;
use crate::geometry::{
    Bounds, Crossing, get_a_point_on_a_line_closest_to_point, get_vector_length,
    is_point_roughly_on_the_line, vector,
};

/// Centimeters per meter: waypoint files are in meters, tracks work in centimeters
pub const SCALE_TO_CENTIMETERS: f64 = 100.0;

/// A track built from its waypoints
///
/// All derived sequences are computed once in the constructor and never change.
/// The borders and center line are in centimeters; `road_poly` keeps the
/// waypoint unit (meters).
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    waypoints: Vec<Waypoint>,
    center_line: Vec<Coord<f64>>,
    inner_border: Vec<Coord<f64>>,
    outer_border: Vec<Coord<f64>>,
    road_poly: Polygon<f64>,
}

/// Nearest point found on the center line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterLineHit {
    /// Index of the waypoint starting the matched segment (or the matched vertex)
    pub index: usize,
    pub point: Coord<f64>,
    pub distance: f64,
}

impl Track {
    /// Create a track from waypoints in meters
    ///
    /// Values are trusted as given: NaN, repeated waypoints and open or
    /// self-intersecting outlines all pass through unchanged.
    pub fn new(name: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        let scaled = |pick: fn(&Waypoint) -> Coord<f64>| -> Vec<Coord<f64>> {
            waypoints
                .iter()
                .map(|wp| pick(wp) * SCALE_TO_CENTIMETERS)
                .collect()
        };
        let center_line = scaled(|wp| wp.center);
        let inner_border = scaled(|wp| wp.inner);
        let outer_border = scaled(|wp| wp.outer);

        // Outer border forward, then inner border backward
        let ring: LineString<f64> = waypoints
            .iter()
            .map(|wp| wp.outer)
            .chain(waypoints.iter().rev().map(|wp| wp.inner))
            .collect();
        let road_poly = Polygon::new(ring, vec![]);

        Self {
            name: name.into(),
            waypoints,
            center_line,
            inner_border,
            outer_border,
            road_poly,
        }
    }

    /// Create a track from nested six-value records
    ///
    /// # Errors
    /// * `TrackError::InvalidWaypointFormat` - if any record is not six values wide
    pub fn from_records<R: AsRef<[f64]>>(name: impl Into<String>, records: &[R]) -> Result<Self> {
        Ok(Self::new(name, waypoints_from_records(records)?))
    }

    /// Create a track from a row-major array with `columns` values per row
    ///
    /// # Errors
    /// * `TrackError::InvalidWaypointFormat` - if the array is not six columns wide
    pub fn from_flat(name: impl Into<String>, values: &[f64], columns: usize) -> Result<Self> {
        Ok(Self::new(name, waypoints_from_flat(values, columns)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The waypoints as received, in meters
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn center_line(&self) -> &[Coord<f64>] {
        &self.center_line
    }

    pub fn inner_border(&self) -> &[Coord<f64>] {
        &self.inner_border
    }

    pub fn outer_border(&self) -> &[Coord<f64>] {
        &self.outer_border
    }

    /// Drivable surface between the outer and inner borders, in meters
    pub fn road_poly(&self) -> &Polygon<f64> {
        &self.road_poly
    }

    /// Road ring vertices without the closing point added by the polygon
    pub fn road_ring(&self) -> &[Coord<f64>] {
        let coords = &self.road_poly.exterior().0;
        &coords[..coords.len().min(2 * self.waypoints.len())]
    }

    /// Unsigned area of the road surface in square meters
    pub fn road_area(&self) -> f64 {
        self.road_poly.unsigned_area()
    }

    /// Length of the center line polyline in centimeters
    pub fn center_line_length(&self) -> f64 {
        self.center_line
            .windows(2)
            .map(|pair| get_vector_length(vector(pair[1], pair[0])))
            .sum()
    }

    /// Bounds of the center line and both borders, in centimeters
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds = Bounds::from_points(&self.center_line)?;
        bounds.expand(&self.inner_border);
        bounds.expand(&self.outer_border);
        Some(bounds)
    }

    /// Project `p` (centimeters) onto the nearest part of the center line
    ///
    /// # Algorithm
    /// 1. For each non-degenerate segment, drop a perpendicular from `p`
    /// 2. Keep feet that lie roughly on the segment within `tolerated_angle`
    /// 3. Consider every center-line vertex as well, for points past a corner
    /// 4. Return the candidate closest to `p`
    pub fn closest_center_line_point(
        &self,
        p: Coord<f64>,
        tolerated_angle: f64,
    ) -> Option<CenterLineHit> {
        let on_segments = self
            .center_line
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] != pair[1])
            .filter_map(|(index, pair)| {
                let foot = get_a_point_on_a_line_closest_to_point(pair[0], pair[1], p)
                    .ok()
                    .and_then(Crossing::point)?;
                is_point_roughly_on_the_line(pair[0], pair[1], foot, tolerated_angle)
                    .then_some((index, foot))
            });

        let on_vertices = self.center_line.iter().copied().enumerate();

        on_segments
            .chain(on_vertices)
            .map(|(index, point)| CenterLineHit {
                index,
                point,
                distance: get_vector_length(vector(p, point)),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackError;
    use crate::geometry::DEFAULT_TOLERATED_ANGLE;
    use geo::coord;

    fn straight() -> Track {
        Track::from_records(
            "straight",
            &[
                [0.0, 0.0, 0.0, 1.0, 0.0, -1.0],
                [10.0, 0.0, 10.0, 1.0, 10.0, -1.0],
            ],
        )
        .unwrap()
    }

    fn square_loop() -> Track {
        // Closed 10m square, 2m wide, first waypoint repeated at the end
        Track::from_records(
            "square",
            &[
                [0.0, 0.0, 1.0, 1.0, -1.0, -1.0],
                [10.0, 0.0, 9.0, 1.0, 11.0, -1.0],
                [10.0, 10.0, 9.0, 9.0, 11.0, 11.0],
                [0.0, 10.0, 1.0, 9.0, -1.0, 11.0],
                [0.0, 0.0, 1.0, 1.0, -1.0, -1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_scaled_sequences() {
        let track = straight();
        assert_eq!(track.name(), "straight");
        assert_eq!(
            track.center_line(),
            &[coord! { x: 0.0, y: 0.0 }, coord! { x: 1000.0, y: 0.0 }]
        );
        assert_eq!(
            track.inner_border(),
            &[coord! { x: 0.0, y: 100.0 }, coord! { x: 1000.0, y: 100.0 }]
        );
        assert_eq!(
            track.outer_border(),
            &[coord! { x: 0.0, y: -100.0 }, coord! { x: 1000.0, y: -100.0 }]
        );
    }

    #[test]
    fn test_sequences_match_waypoint_count() {
        let track = square_loop();
        assert_eq!(track.len(), 5);
        assert_eq!(track.center_line().len(), 5);
        assert_eq!(track.inner_border().len(), 5);
        assert_eq!(track.outer_border().len(), 5);
    }

    #[test]
    fn test_center_line_is_exact_multiple() {
        let track = Track::from_records("odd", &[[1.25, -3.5, 0.1, 0.2, 0.3, 0.4]]).unwrap();
        let wp = track.waypoints()[0];
        assert_eq!(track.center_line()[0].x, wp.center.x * 100.0);
        assert_eq!(track.center_line()[0].y, wp.center.y * 100.0);
    }

    #[test]
    fn test_road_ring_outer_then_reversed_inner() {
        let track = straight();
        assert_eq!(
            track.road_ring(),
            &[
                coord! { x: 0.0, y: -1.0 },
                coord! { x: 10.0, y: -1.0 },
                coord! { x: 10.0, y: 1.0 },
                coord! { x: 0.0, y: 1.0 },
            ]
        );
        // The polygon closes the ring back to its first vertex
        assert_eq!(track.road_poly().exterior().0.len(), 5);
        assert_eq!(track.road_area(), 20.0);
    }

    #[test]
    fn test_road_ring_has_twice_the_waypoints() {
        let track = square_loop();
        assert_eq!(track.road_ring().len(), 2 * track.len());
    }

    #[test]
    fn test_repeated_waypoints_are_kept() {
        let track = Track::from_records(
            "stutter",
            &[
                [0.0, 0.0, 0.0, 1.0, 0.0, -1.0],
                [0.0, 0.0, 0.0, 1.0, 0.0, -1.0],
                [5.0, 0.0, 5.0, 1.0, 5.0, -1.0],
            ],
        )
        .unwrap();
        assert_eq!(track.len(), 3);
        assert_eq!(track.road_ring().len(), 6);
        assert_eq!(track.center_line_length(), 500.0);
    }

    #[test]
    fn test_invalid_record_width() {
        let result = Track::from_records("bad", &[vec![0.0; 6], vec![0.0; 7]]);
        assert!(matches!(
            result,
            Err(TrackError::InvalidWaypointFormat { found: 7 })
        ));
    }

    #[test]
    fn test_from_flat() {
        let values = [0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 10.0, 0.0, 10.0, 1.0, 10.0, -1.0];
        let track = Track::from_flat("flat", &values, 6).unwrap();
        assert_eq!(track.center_line()[1], coord! { x: 1000.0, y: 0.0 });

        assert!(Track::from_flat("flat", &values, 3).is_err());
    }

    #[test]
    fn test_empty_track() {
        let track = Track::new("empty", Vec::new());
        assert!(track.is_empty());
        assert!(track.road_ring().is_empty());
        assert!(track.bounds().is_none());
        assert!(
            track
                .closest_center_line_point(coord! { x: 0.0, y: 0.0 }, DEFAULT_TOLERATED_ANGLE)
                .is_none()
        );
    }

    #[test]
    fn test_center_line_length_and_bounds() {
        let track = square_loop();
        assert_eq!(track.center_line_length(), 4000.0);

        let bounds = track.bounds().unwrap();
        assert_eq!(bounds.min_x, -100.0);
        assert_eq!(bounds.max_x, 1100.0);
        assert_eq!(bounds.min_y, -100.0);
        assert_eq!(bounds.max_y, 1100.0);
    }

    #[test]
    fn test_closest_center_line_point_on_segment() {
        let track = square_loop();
        let hit = track
            .closest_center_line_point(coord! { x: 400.0, y: 30.0 }, DEFAULT_TOLERATED_ANGLE)
            .unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.point, coord! { x: 400.0, y: 0.0 });
        assert_eq!(hit.distance, 30.0);
    }

    #[test]
    fn test_closest_center_line_point_falls_back_to_corner() {
        let track = square_loop();
        let hit = track
            .closest_center_line_point(coord! { x: 1100.0, y: -100.0 }, DEFAULT_TOLERATED_ANGLE)
            .unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.point, coord! { x: 1000.0, y: 0.0 });
    }

    #[test]
    fn test_track_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Track>();
    }
}
