//! Viewport geometry: screen/surface transforms, zoom, pan and clamping.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    INITIAL_VIEW_HEIGHT, INITIAL_VIEW_WIDTH, MAX_VIEW_HEIGHT, MAX_VIEW_WIDTH, MIN_VIEW_HEIGHT, MIN_VIEW_WIDTH,
    SURFACE_HEIGHT, SURFACE_WIDTH,
};

/// A point in either screen or surface space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Client rectangle of the element hosting the drawing surface, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// The visible rectangle of the drawing surface (the SVG `viewBox`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, width: INITIAL_VIEW_WIDTH, height: INITIAL_VIEW_HEIGHT }
    }
}

/// Size limits for the viewport and the bounds of the surface it moves over.
///
/// The effective maximum viewport size is the smaller of the configured
/// maximum and the surface size, so a clamped viewport always fits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLimits {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub surface_width: f64,
    pub surface_height: f64,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_width: MIN_VIEW_WIDTH,
            max_width: MAX_VIEW_WIDTH,
            min_height: MIN_VIEW_HEIGHT,
            max_height: MAX_VIEW_HEIGHT,
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
        }
    }
}

impl ViewportLimits {
    fn clamp_width(&self, width: f64) -> f64 {
        clamp_span(width, self.min_width, self.max_width, self.surface_width)
    }

    fn clamp_height(&self, height: f64) -> f64 {
        clamp_span(height, self.min_height, self.max_height, self.surface_height)
    }

    /// Clamp size to the limits, then position so the viewport stays on the surface.
    #[must_use]
    pub fn clamp(&self, viewport: Viewport) -> Viewport {
        let width = self.clamp_width(viewport.width);
        let height = self.clamp_height(viewport.height);
        Viewport {
            x: viewport.x.clamp(0.0, (self.surface_width - width).max(0.0)),
            y: viewport.y.clamp(0.0, (self.surface_height - height).max(0.0)),
            width,
            height,
        }
    }
}

fn clamp_span(value: f64, min: f64, max: f64, surface: f64) -> f64 {
    let upper = max.min(surface);
    let lower = min.min(upper);
    value.clamp(lower, upper)
}

/// Convert a screen-space point (client pixels) to surface coordinates.
///
/// Returns the viewport origin when the element has no area.
#[must_use]
pub fn screen_to_surface(screen: Point, viewport: &Viewport, bbox: &BoundingBox) -> Point {
    if bbox.is_degenerate() {
        return Point::new(viewport.x, viewport.y);
    }
    Point {
        x: viewport.x + (screen.x - bbox.left) / bbox.width * viewport.width,
        y: viewport.y + (screen.y - bbox.top) / bbox.height * viewport.height,
    }
}

/// Convert a surface point back to screen space (client pixels).
#[must_use]
pub fn surface_to_screen(surface: Point, viewport: &Viewport, bbox: &BoundingBox) -> Point {
    if viewport.width == 0.0 || viewport.height == 0.0 {
        return Point::new(bbox.left, bbox.top);
    }
    Point {
        x: bbox.left + (surface.x - viewport.x) / viewport.width * bbox.width,
        y: bbox.top + (surface.y - viewport.y) / viewport.height * bbox.height,
    }
}

/// Scale the viewport by `factor` around `pivot` (a surface point).
///
/// `factor > 1` zooms out, `factor < 1` zooms in. Width and height are clamped
/// independently, and the pivot keeps its relative position on each axis.
#[must_use]
pub fn zoom_at(viewport: &Viewport, factor: f64, pivot: Point, limits: &ViewportLimits) -> Viewport {
    if !factor.is_finite() || factor <= 0.0 {
        return *viewport;
    }
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return limits.clamp(*viewport);
    }
    let width = limits.clamp_width(viewport.width * factor);
    let height = limits.clamp_height(viewport.height * factor);
    let x = pivot.x - (pivot.x - viewport.x) * (width / viewport.width);
    let y = pivot.y - (pivot.y - viewport.y) * (height / viewport.height);
    limits.clamp(Viewport { x, y, width, height })
}

/// Move the viewport by a screen-space drag delta.
///
/// Dragging right moves the surface right under the cursor, so the viewport
/// origin moves left.
#[must_use]
pub fn pan(viewport: &Viewport, screen_delta: Point, bbox: &BoundingBox, limits: &ViewportLimits) -> Viewport {
    if bbox.is_degenerate() {
        return *viewport;
    }
    let dx = screen_delta.x * viewport.width / bbox.width;
    let dy = screen_delta.y * viewport.height / bbox.height;
    limits.clamp(Viewport { x: viewport.x - dx, y: viewport.y - dy, ..*viewport })
}
