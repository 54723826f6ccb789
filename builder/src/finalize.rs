//! Turn a finished shape into entity-creation input.
//!
//! The persisted form of a footprint is its bounding position, plus
//! width/height for kinds that carry them, plus an optional custom polygon
//! serialized as `{"customShape":[{"x":..,"y":..},...]}` into the entity's
//! free-text description. A custom polygon's first-class position is always
//! the minimum x/y of its vertices.

#[cfg(test)]
#[path = "finalize_test.rs"]
mod finalize_test;

use serde::{Deserialize, Serialize};

use crate::shape::{DrawMode, FinishedShape};
use crate::viewport::Point;

/// JSON key wrapping the serialized polygon.
pub const CUSTOM_SHAPE_KEY: &str = "customShape";

/// Which entity a drawn shape becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Building,
    Room,
    Hallway,
}

impl ShapeKind {
    /// Whether entities of this kind store their own width and height.
    #[must_use]
    pub fn has_size(self) -> bool {
        matches!(self, Self::Room | Self::Hallway)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Room => "room",
            Self::Hallway => "hallway",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "building" => Some(Self::Building),
            "room" => Some(Self::Room),
            "hallway" => Some(Self::Hallway),
            _ => None,
        }
    }
}

/// Width and height of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Geometry fields for creating a building, room, or hallway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInput {
    pub kind: ShapeKind,
    pub map_position_x: f64,
    pub map_position_y: f64,
    /// Present for kinds where [`ShapeKind::has_size`] is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Serialized `{"customShape": [...]}` document, when the outline is not
    /// reconstructable from position and size alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_shape: Option<String>,
}

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of `points`, or `None` when empty.
    #[must_use]
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size { width: self.max_x - self.min_x, height: self.max_y - self.min_y }
    }
}

/// Build entity input for `kind` from a finished shape.
///
/// Coincident points are accepted and produce a zero-sized box.
#[must_use]
pub fn to_entity_input(shape: &FinishedShape, kind: ShapeKind) -> EntityInput {
    let bounds = Bounds::of(&shape.points).unwrap_or(Bounds { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 });
    let size = kind.has_size().then(|| bounds.size());

    // Rectangles of sized kinds are fully described by position + size.
    let keep_outline = shape.mode == DrawMode::Freehand || !kind.has_size();
    let custom_shape = (keep_outline && shape.points.len() > 2).then(|| serialize_custom_shape(&shape.points));

    EntityInput { kind, map_position_x: bounds.min_x, map_position_y: bounds.min_y, size, custom_shape }
}

/// Serialize `points` as a `{"customShape": [...]}` document.
#[must_use]
pub fn serialize_custom_shape(points: &[Point]) -> String {
    serde_json::json!({ CUSTOM_SHAPE_KEY: points }).to_string()
}

/// Read a `{"customShape": [...]}` document back. Returns `None` for any other
/// text, including plain descriptions.
#[must_use]
pub fn parse_custom_shape(text: &str) -> Option<Vec<Point>> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return None;
    };
    let Ok(points) = serde_json::from_value(value.get(CUSTOM_SHAPE_KEY)?.clone()) else {
        return None;
    };
    Some(points)
}
