//! Shape model: draw modes, in-progress shapes, and the accumulator state machine.
//!
//! A [`ShapeAccumulator`] is either `Idle` or `Drawing` a single shape. In
//! freehand mode every accepted click appends a vertex, and a click close to
//! the first vertex closes the polygon. In rectangle mode the first click sets
//! the start corner and the second click sets the end corner and closes the
//! rectangle. Closing yields a [`FinishedShape`] and returns the accumulator to
//! `Idle`; a failed explicit finish leaves the shape untouched.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};

use crate::consts::{AUTO_CLOSE_GRID_MULTIPLE, MIN_POLYGON_POINTS};
use crate::viewport::Point;

/// How clicks are turned into a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Two clicks: opposite corners of an axis-aligned rectangle.
    #[default]
    Rectangle,
    /// One click per vertex of an arbitrary polygon.
    Freehand,
}

/// A shape that is still being drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeInProgress {
    Rectangle { start: Option<Point>, end: Option<Point> },
    Freehand { points: Vec<Point> },
}

impl ShapeInProgress {
    fn empty(mode: DrawMode) -> Self {
        match mode {
            DrawMode::Rectangle => Self::Rectangle { start: None, end: None },
            DrawMode::Freehand => Self::Freehand { points: Vec::new() },
        }
    }

    /// The mode this shape was started in.
    #[must_use]
    pub fn mode(&self) -> DrawMode {
        match self {
            Self::Rectangle { .. } => DrawMode::Rectangle,
            Self::Freehand { .. } => DrawMode::Freehand,
        }
    }

    /// Recorded vertices, for previews. A rectangle with one corner yields one point.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::Rectangle { start: Some(a), end: Some(b) } => rectangle_corners(*a, *b).to_vec(),
            Self::Rectangle { start, end } => start.iter().chain(end.iter()).copied().collect(),
            Self::Freehand { points } => points.clone(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Rectangle { start, end } => start.is_none() && end.is_none(),
            Self::Freehand { points } => points.is_empty(),
        }
    }
}

/// A closed shape ready to be turned into entity input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedShape {
    /// Mode the shape was drawn in.
    pub mode: DrawMode,
    /// Ordered vertices. Rectangles are normalized to four clockwise corners.
    pub points: Vec<Point>,
}

/// Why a shape operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("need at least {required} points, have {have}")]
    TooFewPoints { required: usize, have: usize },
    #[error("rectangle needs two corners")]
    IncompleteRectangle,
    #[error("not drawing")]
    NotDrawing,
    #[error("operation requires {expected:?} mode, shape is {actual:?}")]
    WrongMode { expected: DrawMode, actual: DrawMode },
}

/// Result of feeding one click into the accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The click was recorded; the shape is still open.
    Pending,
    /// The click closed the shape. The accumulator is back to `Idle`.
    Finished(FinishedShape),
}

/// Accumulator state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing(ShapeInProgress),
}

/// Collects clicks into a closed shape.
#[derive(Debug, Clone, Default)]
pub struct ShapeAccumulator {
    mode: DrawMode,
    state: DrawState,
    grid_size: f64,
}

impl ShapeAccumulator {
    /// Create an idle accumulator. `grid_size` sets the freehand auto-close radius.
    #[must_use]
    pub fn new(mode: DrawMode, grid_size: f64) -> Self {
        Self { mode, state: DrawState::Idle, grid_size }
    }

    #[must_use]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing(_))
    }

    /// Change the draw mode. Any shape in progress is discarded.
    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
        self.state = DrawState::Idle;
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.grid_size = grid_size;
    }

    /// Begin a new empty shape in the current mode, replacing any shape in progress.
    pub fn start_drawing(&mut self) {
        self.state = DrawState::Drawing(ShapeInProgress::empty(self.mode));
    }

    /// Discard the shape in progress and return to `Idle`.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    /// Route a click to [`Self::add_point`] or [`Self::set_corner`] by mode.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::NotDrawing`] when idle.
    pub fn click(&mut self, p: Point) -> Result<Step, ShapeError> {
        match self.mode {
            DrawMode::Freehand => self.add_point(p),
            DrawMode::Rectangle => self.set_corner(p),
        }
    }

    /// Append a freehand vertex, or close the polygon when `p` lands within
    /// the auto-close radius of the first vertex of a shape with 3+ points.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::NotDrawing`] when idle and
    /// [`ShapeError::WrongMode`] when drawing a rectangle.
    pub fn add_point(&mut self, p: Point) -> Result<Step, ShapeError> {
        let radius = self.grid_size * AUTO_CLOSE_GRID_MULTIPLE;
        let points = match &mut self.state {
            DrawState::Idle => return Err(ShapeError::NotDrawing),
            DrawState::Drawing(ShapeInProgress::Freehand { points }) => points,
            DrawState::Drawing(shape) => {
                return Err(ShapeError::WrongMode { expected: DrawMode::Freehand, actual: shape.mode() });
            }
        };

        let closes = points.len() >= MIN_POLYGON_POINTS && points.first().is_some_and(|first| p.distance(*first) < radius);
        if closes {
            return self.finish().map(Step::Finished);
        }
        points.push(p);
        Ok(Step::Pending)
    }

    /// Set the next rectangle corner. The second corner closes the rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::NotDrawing`] when idle and
    /// [`ShapeError::WrongMode`] when drawing freehand.
    pub fn set_corner(&mut self, p: Point) -> Result<Step, ShapeError> {
        match &mut self.state {
            DrawState::Idle => Err(ShapeError::NotDrawing),
            DrawState::Drawing(ShapeInProgress::Rectangle { start, end }) => {
                if start.is_none() {
                    *start = Some(p);
                    return Ok(Step::Pending);
                }
                *end = Some(p);
                self.finish().map(Step::Finished)
            }
            DrawState::Drawing(shape) => Err(ShapeError::WrongMode { expected: DrawMode::Rectangle, actual: shape.mode() }),
        }
    }

    /// Remove the most recent vertex or corner. Never leaves `Drawing` and
    /// is a no-op on an empty shape or when idle.
    pub fn undo(&mut self) {
        let DrawState::Drawing(shape) = &mut self.state else {
            return;
        };
        if shape.is_empty() {
            return;
        }
        match shape {
            ShapeInProgress::Freehand { points } => {
                points.pop();
            }
            ShapeInProgress::Rectangle { start, end } => {
                if end.is_some() {
                    *end = None;
                } else {
                    *start = None;
                }
            }
        }
    }

    /// Close the shape in progress.
    ///
    /// On success the accumulator returns to `Idle`. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TooFewPoints`] for a freehand shape with fewer than
    /// three vertices, [`ShapeError::IncompleteRectangle`] for a rectangle
    /// missing a corner, and [`ShapeError::NotDrawing`] when idle.
    pub fn finish(&mut self) -> Result<FinishedShape, ShapeError> {
        let finished = match &self.state {
            DrawState::Idle => return Err(ShapeError::NotDrawing),
            DrawState::Drawing(ShapeInProgress::Freehand { points }) => {
                if points.len() < MIN_POLYGON_POINTS {
                    return Err(ShapeError::TooFewPoints { required: MIN_POLYGON_POINTS, have: points.len() });
                }
                FinishedShape { mode: DrawMode::Freehand, points: points.clone() }
            }
            DrawState::Drawing(ShapeInProgress::Rectangle { start: Some(a), end: Some(b) }) => {
                FinishedShape { mode: DrawMode::Rectangle, points: rectangle_corners(*a, *b).to_vec() }
            }
            DrawState::Drawing(ShapeInProgress::Rectangle { .. }) => return Err(ShapeError::IncompleteRectangle),
        };
        self.state = DrawState::Idle;
        Ok(finished)
    }
}

/// Axis-aligned corners of the rectangle spanned by `a` and `b`, clockwise
/// from the top-left, independent of which corner was clicked first.
#[must_use]
pub fn rectangle_corners(a: Point, b: Point) -> [Point; 4] {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    [
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(max_x, max_y),
        Point::new(min_x, max_y),
    ]
}
