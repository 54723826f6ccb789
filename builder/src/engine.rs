//! Builder engine: pointer and keyboard events in, host actions out.
//!
//! `BuilderCore` is the explicit session state of one builder view. It owns
//! the viewport, grid settings, draw mode, target kind, and the shape
//! accumulator, and runs every click through the pipeline
//! screen → surface → snap → accumulator → finalize.
//!
//! A finished shape is reset out of the accumulator before the resulting
//! [`Action::Submit`] is handed to the host, so the host's store call is
//! fire-and-forget from the engine's point of view.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;

use crate::consts::ZOOM_STEP;
use crate::finalize::{EntityInput, ShapeKind, to_entity_input};
use crate::shape::{DrawMode, DrawState, FinishedShape, ShapeAccumulator, ShapeError, Step};
use crate::snap::Grid;
use crate::viewport::{self, BoundingBox, Point, Viewport, ViewportLimits};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// A shape was closed; persist it through the entity store.
    Submit(EntityInput),
    /// A finish/click was rejected; show the message, the shape is unchanged.
    ValidationFailed(String),
    /// The viewBox moved or scaled.
    ViewportChanged(Viewport),
    RenderNeeded,
}

/// Keyboard/mouse modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`, `"Enter"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Session state of one builder view.
///
/// Viewport, limits and grid change only through their setters, which keep
/// the viewport clamped and the auto-close radius on the current grid.
#[derive(Debug, Clone)]
pub struct BuilderCore {
    viewport: Viewport,
    limits: ViewportLimits,
    grid: Grid,
    pub target: ShapeKind,
    shapes: ShapeAccumulator,
}

impl Default for BuilderCore {
    fn default() -> Self {
        let grid = Grid::default();
        Self {
            viewport: Viewport::default(),
            limits: ViewportLimits::default(),
            grid,
            target: ShapeKind::default(),
            shapes: ShapeAccumulator::new(DrawMode::default(), grid.size),
        }
    }
}

impl BuilderCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over a custom surface.
    #[must_use]
    pub fn with_limits(limits: ViewportLimits) -> Self {
        let mut core = Self::new();
        core.set_limits(limits);
        core
    }

    // --- Settings ---

    /// Switch draw mode. Discards any shape in progress.
    pub fn set_mode(&mut self, mode: DrawMode) {
        self.shapes.set_mode(mode);
    }

    pub fn set_target(&mut self, target: ShapeKind) {
        self.target = target;
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.shapes.set_grid_size(grid.size);
    }

    /// Replace the surface limits and re-clamp the viewport into them.
    pub fn set_limits(&mut self, limits: ViewportLimits) -> Vec<Action> {
        self.limits = limits;
        self.set_viewport(self.viewport)
    }

    /// Move the viewBox, clamped to the current limits.
    pub fn set_viewport(&mut self, next: Viewport) -> Vec<Action> {
        let next = self.limits.clamp(next);
        if next == self.viewport {
            return Vec::new();
        }
        self.viewport = next;
        vec![Action::ViewportChanged(next), Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn limits(&self) -> ViewportLimits {
        self.limits
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn mode(&self) -> DrawMode {
        self.shapes.mode()
    }

    #[must_use]
    pub fn draw_state(&self) -> &DrawState {
        self.shapes.state()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.shapes.is_drawing()
    }

    /// Vertices of the shape in progress, for the preview overlay.
    #[must_use]
    pub fn preview(&self) -> Vec<Point> {
        match self.shapes.state() {
            DrawState::Idle => Vec::new(),
            DrawState::Drawing(shape) => shape.points(),
        }
    }

    // --- Drawing lifecycle ---

    pub fn start_drawing(&mut self) -> Vec<Action> {
        self.shapes.start_drawing();
        vec![Action::RenderNeeded]
    }

    pub fn cancel(&mut self) -> Vec<Action> {
        self.shapes.cancel();
        vec![Action::RenderNeeded]
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.shapes.undo();
        vec![Action::RenderNeeded]
    }

    /// Explicitly close the shape in progress.
    pub fn finish(&mut self) -> Vec<Action> {
        match self.shapes.finish() {
            Ok(shape) => self.submit(&shape),
            Err(err) => vec![err.into()],
        }
    }

    // --- Input events ---

    /// A primary click on the drawing surface.
    ///
    /// Ignored when no shape is being drawn.
    pub fn on_click(&mut self, screen: Point, bbox: &BoundingBox) -> Vec<Action> {
        if !self.shapes.is_drawing() {
            return Vec::new();
        }
        let surface = viewport::screen_to_surface(screen, &self.viewport, bbox);
        let point = self.grid.apply(surface);
        match self.shapes.click(point) {
            Ok(Step::Pending) => vec![Action::RenderNeeded],
            Ok(Step::Finished(shape)) => self.submit(&shape),
            Err(err) => vec![err.into()],
        }
    }

    /// Wheel zoom towards the cursor. Positive `delta_y` (scroll down) zooms out.
    pub fn on_wheel(&mut self, screen: Point, bbox: &BoundingBox, delta_y: f64) -> Vec<Action> {
        if delta_y == 0.0 {
            return Vec::new();
        }
        let factor = if delta_y > 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        let pivot = viewport::screen_to_surface(screen, &self.viewport, bbox);
        let next = viewport::zoom_at(&self.viewport, factor, pivot, &self.limits);
        self.set_viewport(next)
    }

    /// Drag-to-pan by a screen-space delta.
    pub fn on_pan(&mut self, screen_delta: Point, bbox: &BoundingBox) -> Vec<Action> {
        let next = viewport::pan(&self.viewport, screen_delta, bbox, &self.limits);
        self.set_viewport(next)
    }

    /// Keyboard shortcuts: `Escape` cancels, `Enter` finishes, Ctrl/Cmd+Z undoes.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if !self.shapes.is_drawing() {
            return Vec::new();
        }
        match key.0.as_str() {
            "Escape" => self.cancel(),
            "Enter" => self.finish(),
            "z" | "Z" if modifiers.ctrl || modifiers.meta => self.undo(),
            _ => Vec::new(),
        }
    }

    fn submit(&self, shape: &FinishedShape) -> Vec<Action> {
        vec![Action::Submit(to_entity_input(shape, self.target)), Action::RenderNeeded]
    }
}

impl From<ShapeError> for Action {
    fn from(err: ShapeError) -> Self {
        Self::ValidationFailed(err.to_string())
    }
}
