use std::path::Path;

use geo::Coord;

use super::canvas::Canvas;
use crate::domain::{Track, Waypoint};
use crate::error::{Result, TrackError};
use crate::geometry::Bounds;

const CANVAS_SIZE: f64 = 1000.0;
const CANVAS_PADDING: f64 = 40.0;
const MARKER_RADIUS: f64 = 3.0;

pub const CENTER_COLOR: &str = "blue";
pub const INNER_COLOR: &str = "black";
pub const OUTER_COLOR: &str = "cyan";

/// A rendered scatter plot of track waypoints
#[derive(Debug, Clone)]
pub struct TrackSvg {
    pub view_box: String,
    pub document: String,
    pub markers: usize,
}

/// Scatter plot of every waypoint as three markers: center, inner and outer
///
/// Markers are drawn waypoint by waypoint, so later waypoints overlap earlier ones.
pub fn plot_trackpoints(waypoints: &[Waypoint]) -> TrackSvg {
    let points: Vec<Coord<f64>> = waypoints
        .iter()
        .flat_map(|wp| [wp.center, wp.inner, wp.outer])
        .collect();

    let view_box = format!("0 0 {CANVAS_SIZE:.0} {CANVAS_SIZE:.0}");
    let mut document = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{view_box}\" width=\"{CANVAS_SIZE:.0}\" height=\"{CANVAS_SIZE:.0}\">\n"
    );

    let mut markers = 0;
    if let Some(bounds) = Bounds::from_points(&points) {
        let canvas = Canvas::fit(&bounds, CANVAS_SIZE, CANVAS_PADDING);
        for wp in waypoints {
            for (point, color) in [
                (wp.center, CENTER_COLOR),
                (wp.inner, INNER_COLOR),
                (wp.outer, OUTER_COLOR),
            ] {
                let (x, y) = canvas.project(point);
                document.push_str(&format!(
                    "  <circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{MARKER_RADIUS}\" fill=\"{color}\"/>\n"
                ));
                markers += 1;
            }
        }
    }

    document.push_str("</svg>\n");

    TrackSvg {
        view_box,
        document,
        markers,
    }
}

/// Scatter plot of a loaded track's waypoints
pub fn plot_track(track: &Track) -> TrackSvg {
    plot_trackpoints(track.waypoints())
}

/// Write a rendered plot to disk
pub fn write_svg(path: &Path, svg: &TrackSvg) -> Result<()> {
    std::fs::write(path, &svg.document).map_err(|source| TrackError::Io {
        path: path.to_path_buf(),
        source,
    })
}
