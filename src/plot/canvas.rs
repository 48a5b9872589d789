use geo::Coord;

use crate::geometry::Bounds;

/// Maps track coordinates onto a square SVG canvas
///
/// The larger track dimension fills the canvas minus padding, the smaller one
/// is centered, and y is flipped so that increasing track y points up.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Canvas units per track unit
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    size: f64,
}

impl Canvas {
    /// Create a canvas fitting `bounds` into `size` x `size` with `padding` on every side
    pub fn fit(bounds: &Bounds, size: f64, padding: f64) -> Self {
        let width = bounds.width();
        let height = bounds.height();

        let usable = size - 2.0 * padding;
        let max_dim = width.max(height);

        let scale = if max_dim > 0.0 { usable / max_dim } else { 1.0 };

        let offset_x = (size - width * scale) / 2.0 - bounds.min_x * scale;
        let offset_y = (size - height * scale) / 2.0 + bounds.max_y * scale;

        Self {
            scale,
            offset_x,
            offset_y,
            size,
        }
    }

    /// Position of a track point on the canvas
    pub fn project(&self, p: Coord<f64>) -> (f64, f64) {
        (
            p.x * self.scale + self.offset_x,
            self.offset_y - p.y * self.scale,
        )
    }

    pub fn size(&self) -> f64 {
        self.size
    }
}
