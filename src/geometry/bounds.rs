use geo::Coord;
use serde::Serialize;

/// Axis-aligned bounding box of a set of points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a set of points
    pub fn from_points(points: &[Coord<f64>]) -> Option<Self> {
        let first = points.first()?;

        let mut bounds = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        bounds.expand(&points[1..]);

        Some(bounds)
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[Coord<f64>]) {
        for p in points {
            self.min_x = self.min_x.min(p.x);
            self.max_x = self.max_x.max(p.x);
            self.min_y = self.min_y.min(p.y);
            self.max_y = self.max_y.max(p.y);
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
