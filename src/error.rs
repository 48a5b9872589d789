use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by track loading and geometry operations.
///
/// Parallel lines are not an error; see [`crate::geometry::Crossing`].
#[derive(Debug, Error)]
pub enum TrackError {
    /// Waypoint records do not decompose into six numeric columns.
    #[error("invalid waypoint format: expected 6 columns, found {found}")]
    InvalidWaypointFormat { found: usize },

    /// A zero-length vector was normalized.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// Slope and intercept were requested for a vertical line.
    #[error("line through points with x = {x} is vertical")]
    VerticalLine { x: f64 },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported npy file: {0}")]
    InvalidNpy(String),
}

pub type Result<T> = std::result::Result<T, TrackError>;
