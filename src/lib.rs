//! trackutils - Load racetrack waypoint files and reason about their geometry

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod io;
pub mod plot;

pub use domain::{Track, Waypoint};
pub use error::{Result, TrackError};
