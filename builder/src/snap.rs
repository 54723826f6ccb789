//! Grid quantization for drawn points.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_GRID_SIZE;
use crate::viewport::Point;

/// Grid settings shared by snapping and the freehand auto-close radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Cell size in surface units.
    pub size: f64,
    /// Whether clicks are snapped to the nearest grid intersection.
    pub snap: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self { size: DEFAULT_GRID_SIZE, snap: true }
    }
}

impl Grid {
    /// Apply this grid's snapping to `point`.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        snap(point, self.size, self.snap)
    }
}

/// Round `point` to the nearest multiple of `grid_size` on each axis.
///
/// Identity when `enabled` is false or the grid size is not positive. Halves
/// round away from zero.
#[must_use]
pub fn snap(point: Point, grid_size: f64, enabled: bool) -> Point {
    if !enabled || grid_size <= 0.0 || !grid_size.is_finite() {
        return point;
    }
    Point {
        x: (point.x / grid_size).round() * grid_size,
        y: (point.y / grid_size).round() * grid_size,
    }
}
