pub mod track;
pub mod waypoint;

pub use track::{CenterLineHit, SCALE_TO_CENTIMETERS, Track};
pub use waypoint::{WAYPOINT_COLUMNS, Waypoint, waypoints_from_flat, waypoints_from_records};
