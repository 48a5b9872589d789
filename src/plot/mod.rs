//! Rendering of waypoint series for visual inspection

pub mod canvas;
pub mod svg;

pub use canvas::Canvas;
pub use svg::{TrackSvg, plot_track, plot_trackpoints, write_svg};
