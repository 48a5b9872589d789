use geo::Coord;

use crate::error::{Result, TrackError};

/// Number of values in one waypoint record
pub const WAYPOINT_COLUMNS: usize = 6;

/// One cross-section of a track, in meters
///
/// Record layout: `[center_x, center_y, inner_x, inner_y, outer_x, outer_y]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub center: Coord<f64>,
    pub inner: Coord<f64>,
    pub outer: Coord<f64>,
}

impl Waypoint {
    pub fn new(center: Coord<f64>, inner: Coord<f64>, outer: Coord<f64>) -> Self {
        Self {
            center,
            inner,
            outer,
        }
    }

    /// Build a waypoint from a six-value record
    ///
    /// # Errors
    /// * `TrackError::InvalidWaypointFormat` - if the record is not exactly six values long
    pub fn from_record(record: &[f64]) -> Result<Self> {
        let &[cx, cy, ix, iy, ox, oy] = record else {
            return Err(TrackError::InvalidWaypointFormat {
                found: record.len(),
            });
        };
        Ok(Self::new(
            Coord { x: cx, y: cy },
            Coord { x: ix, y: iy },
            Coord { x: ox, y: oy },
        ))
    }

    pub fn to_record(&self) -> [f64; WAYPOINT_COLUMNS] {
        [
            self.center.x,
            self.center.y,
            self.inner.x,
            self.inner.y,
            self.outer.x,
            self.outer.y,
        ]
    }
}

/// Split a row-major buffer into waypoints
///
/// # Arguments
/// * `values` - Flattened rows of the waypoint array
/// * `columns` - Width of each row as stored
///
/// # Errors
/// * `TrackError::InvalidWaypointFormat` - if rows are not six values wide or
///   the buffer does not divide into whole rows
pub fn waypoints_from_flat(values: &[f64], columns: usize) -> Result<Vec<Waypoint>> {
    if columns != WAYPOINT_COLUMNS {
        return Err(TrackError::InvalidWaypointFormat { found: columns });
    }
    let trailing = values.len() % WAYPOINT_COLUMNS;
    if trailing != 0 {
        return Err(TrackError::InvalidWaypointFormat { found: trailing });
    }
    values
        .chunks_exact(WAYPOINT_COLUMNS)
        .map(Waypoint::from_record)
        .collect()
}

/// Convert nested records into waypoints, failing on the first record of the wrong width
pub fn waypoints_from_records<R: AsRef<[f64]>>(records: &[R]) -> Result<Vec<Waypoint>> {
    records
        .iter()
        .map(|record| Waypoint::from_record(record.as_ref()))
        .collect()
}
