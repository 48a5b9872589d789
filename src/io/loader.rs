use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::npy::read_npy;
use crate::domain::{Track, Waypoint, waypoints_from_flat};
use crate::error::{Result, TrackError};

pub const DEFAULT_TRACKS_DIR: &str = "./tracks";
pub const TRACK_EXTENSION: &str = ".npy";

/// Loads track waypoint files from a base directory
///
/// Each file holds a 2-D array with one six-value row per waypoint, in meters.
/// Track names are accepted with or without the `.npy` suffix.
#[derive(Debug, Clone)]
pub struct TrackIo {
    base_path: PathBuf,
}

impl Default for TrackIo {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKS_DIR)
    }
}

impl TrackIo {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the waypoint file for `track_name`
    pub fn track_path(&self, track_name: &str) -> PathBuf {
        self.base_path
            .join(format!("{}{}", normalize_track_name(track_name), TRACK_EXTENSION))
    }

    /// Load the raw waypoints of a track
    ///
    /// Any float array with six columns is accepted; nothing checks that it
    /// actually describes a track.
    ///
    /// # Errors
    /// * `TrackError::Io` - if the file cannot be read
    /// * `TrackError::InvalidNpy` - if the file is not a float `.npy` array
    /// * `TrackError::InvalidWaypointFormat` - if the array is not six columns wide
    pub fn get_track_waypoints(&self, track_name: &str) -> Result<Vec<Waypoint>> {
        let path = self.track_path(track_name);
        debug!(path = %path.display(), "reading waypoint file");

        let array = read_npy(&path)?;
        let (_, columns) = array.dims_2d().ok_or(TrackError::InvalidWaypointFormat {
            found: array.shape.last().copied().unwrap_or(0),
        })?;

        waypoints_from_flat(&array.data, columns)
    }

    /// Load a track by name
    ///
    /// The returned track is named without the `.npy` suffix.
    pub fn load_track(&self, track_name: &str) -> Result<Track> {
        let name = normalize_track_name(track_name);
        let waypoints = self.get_track_waypoints(name)?;

        info!(track = name, waypoints = waypoints.len(), "loaded waypoints");

        Ok(Track::new(name, waypoints))
    }
}

/// Strip a trailing `.npy` from a track name
pub fn normalize_track_name(track_name: &str) -> &str {
    track_name
        .strip_suffix(TRACK_EXTENSION)
        .unwrap_or(track_name)
}
