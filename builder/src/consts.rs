//! Shared numeric defaults for the builder crate.

// ── Surface ─────────────────────────────────────────────────────

/// Width of the bounded drawing surface, in surface units.
pub const SURFACE_WIDTH: f64 = 5000.0;

/// Height of the bounded drawing surface, in surface units.
pub const SURFACE_HEIGHT: f64 = 3000.0;

// ── Viewport limits ─────────────────────────────────────────────

/// Smallest viewBox width (most zoomed in).
pub const MIN_VIEW_WIDTH: f64 = 500.0;

/// Largest viewBox width (most zoomed out), before the surface clamp.
pub const MAX_VIEW_WIDTH: f64 = 10_000.0;

/// Smallest viewBox height.
pub const MIN_VIEW_HEIGHT: f64 = 300.0;

/// Largest viewBox height, before the surface clamp.
pub const MAX_VIEW_HEIGHT: f64 = 6_000.0;

/// Initial viewBox width.
pub const INITIAL_VIEW_WIDTH: f64 = 2000.0;

/// Initial viewBox height.
pub const INITIAL_VIEW_HEIGHT: f64 = 1200.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Scale applied per wheel notch. Scrolling down zooms out by this factor,
/// scrolling up zooms in by its inverse.
pub const ZOOM_STEP: f64 = 1.1;

// ── Grid ────────────────────────────────────────────────────────

/// Default grid cell size in surface units.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// A freehand click within this many grid cells of the first point closes
/// the shape.
pub const AUTO_CLOSE_GRID_MULTIPLE: f64 = 2.0;

/// Minimum vertex count for a freehand polygon.
pub const MIN_POLYGON_POINTS: usize = 3;
