//! Campus entity model.
//!
//! DESIGN
//! ======
//! Every entity kind is a tagged variant of [`EntityData`]; the JSON form is
//! camelCase with a `kind` discriminator, so a room reads
//! `{"kind":"room","buildingId":"..","roomNumber":"101",..}`. Stored entities
//! wrap the data with an id and the soft-delete flag.
//!
//! Buildings, rooms and hallways may carry a custom outline serialized into
//! `description` as `{"customShape":[..]}`. When present, the entity's map
//! position must equal the outline's minimum x/y. [`EntityData::validate`]
//! enforces this together with the required fields, and every store runs it
//! on create and update.

use std::fmt;

use builder::finalize::{Bounds, parse_custom_shape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position tolerance when comparing a stored position with its outline.
const POSITION_EPSILON: f64 = 1e-9;

/// Fields a patch may never touch.
const PROTECTED_FIELDS: [&str; 3] = ["id", "kind", "active"];

// =============================================================================
// KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Building,
    Room,
    Hallway,
    Staff,
    Announcement,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [Self::Building, Self::Room, Self::Hallway, Self::Staff, Self::Announcement];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Room => "room",
            Self::Hallway => "hallway",
            Self::Staff => "staff",
            Self::Announcement => "announcement",
        }
    }

    /// REST collection segment, e.g. `buildings`.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Self::Building => "buildings",
            Self::Room => "rooms",
            Self::Hallway => "hallways",
            Self::Staff => "staff",
            Self::Announcement => "announcements",
        }
    }

    #[must_use]
    pub fn from_collection(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == raw)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// KIND PAYLOADS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Building {
    pub name: String,
    pub code: String,
    pub description: String,
    pub floors: u32,
    pub map_position_x: f64,
    pub map_position_y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Room {
    pub building_id: Option<Uuid>,
    pub floor: i32,
    pub room_number: String,
    pub name: String,
    pub room_type: String,
    pub description: String,
    pub map_position_x: f64,
    pub map_position_y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hallway {
    pub building_id: Option<Uuid>,
    pub floor: i32,
    pub name: String,
    pub description: String,
    pub map_position_x: f64,
    pub map_position_y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Staff {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub building_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Announcement {
    pub title: String,
    pub body: String,
    /// RFC 3339 timestamp; the announcement is hidden by clients after it.
    pub expires_at: Option<String>,
}

// =============================================================================
// ENTITY
// =============================================================================

/// Kind-tagged entity fields, without identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityData {
    Building(Building),
    Room(Room),
    Hallway(Hallway),
    Staff(Staff),
    Announcement(Announcement),
}

/// Input for [`crate::store::EntityStore::create_entity`].
pub type NewEntity = EntityData;

/// A persisted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    pub active: bool,
    #[serde(flatten)]
    pub data: EntityData,
}

impl Entity {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} requires {field}")]
    MissingField { kind: EntityKind, field: &'static str },
    #[error("custom shape starts at ({min_x}, {min_y}) but position is ({x}, {y})")]
    ShapePosition { min_x: f64, min_y: f64, x: f64, y: f64 },
    #[error("field `{0}` is not patchable")]
    NotPatchable(String),
    #[error("patch must be a JSON object")]
    PatchNotObject,
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
    #[error("expected {expected}, got {actual}")]
    KindMismatch { expected: EntityKind, actual: EntityKind },
}

impl EntityData {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Building(_) => EntityKind::Building,
            Self::Room(_) => EntityKind::Room,
            Self::Hallway(_) => EntityKind::Hallway,
            Self::Staff(_) => EntityKind::Staff,
            Self::Announcement(_) => EntityKind::Announcement,
        }
    }

    /// Owning building, for kinds that reference one.
    #[must_use]
    pub fn building_id(&self) -> Option<Uuid> {
        match self {
            Self::Room(r) => r.building_id,
            Self::Hallway(h) => h.building_id,
            Self::Staff(s) => s.building_id,
            Self::Building(_) | Self::Announcement(_) => None,
        }
    }

    #[must_use]
    pub fn floor(&self) -> Option<i32> {
        match self {
            Self::Room(r) => Some(r.floor),
            Self::Hallway(h) => Some(h.floor),
            Self::Building(_) | Self::Staff(_) | Self::Announcement(_) => None,
        }
    }

    /// Map position and description, for kinds drawn on the map.
    fn placement(&self) -> Option<(f64, f64, &str)> {
        match self {
            Self::Building(b) => Some((b.map_position_x, b.map_position_y, &b.description)),
            Self::Room(r) => Some((r.map_position_x, r.map_position_y, &r.description)),
            Self::Hallway(h) => Some((h.map_position_x, h.map_position_y, &h.description)),
            Self::Staff(_) | Self::Announcement(_) => None,
        }
    }

    /// Check required fields and the custom-shape position invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = self.kind();
        let missing = |field| Err(ValidationError::MissingField { kind, field });
        match self {
            Self::Building(b) if is_blank(&b.name) => return missing("name"),
            Self::Room(r) if r.building_id.is_none() => return missing("buildingId"),
            Self::Room(r) if is_blank(&r.room_number) => return missing("roomNumber"),
            Self::Hallway(h) if h.building_id.is_none() => return missing("buildingId"),
            Self::Hallway(h) if is_blank(&h.name) => return missing("name"),
            Self::Staff(s) if is_blank(&s.name) => return missing("name"),
            Self::Announcement(a) if is_blank(&a.title) => return missing("title"),
            _ => {}
        }
        self.check_shape_position()
    }

    fn check_shape_position(&self) -> Result<(), ValidationError> {
        let Some((x, y, description)) = self.placement() else {
            return Ok(());
        };
        let Some(bounds) = parse_custom_shape(description).as_deref().and_then(Bounds::of) else {
            return Ok(());
        };
        if (bounds.min_x - x).abs() > POSITION_EPSILON || (bounds.min_y - y).abs() > POSITION_EPSILON {
            return Err(ValidationError::ShapePosition { min_x: bounds.min_x, min_y: bounds.min_y, x, y });
        }
        Ok(())
    }

    /// Merge a camelCase JSON object patch over these fields and revalidate.
    ///
    /// `null` resets a field to its default.
    ///
    /// # Errors
    ///
    /// Rejects non-object patches, protected keys, type mismatches, and any
    /// result that fails [`EntityData::validate`].
    pub fn patched(&self, patch: &serde_json::Value) -> Result<Self, ValidationError> {
        let Some(changes) = patch.as_object() else {
            return Err(ValidationError::PatchNotObject);
        };
        if let Some(key) = changes.keys().find(|k| PROTECTED_FIELDS.contains(&k.as_str())) {
            return Err(ValidationError::NotPatchable(key.clone()));
        }

        let mut doc = serde_json::to_value(self).map_err(|e| ValidationError::InvalidPatch(e.to_string()))?;
        if let Some(fields) = doc.as_object_mut() {
            for (key, value) in changes {
                if value.is_null() {
                    fields.remove(key);
                } else {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }

        let next: Self = serde_json::from_value(doc).map_err(|e| ValidationError::InvalidPatch(e.to_string()))?;
        next.validate()?;
        Ok(next)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// =============================================================================
// LIST FILTER
// =============================================================================

/// Narrowing applied by `list_entities`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListFilter {
    pub building_id: Option<Uuid>,
    pub floor: Option<i32>,
    pub include_inactive: bool,
}

impl ListFilter {
    #[must_use]
    pub fn for_building(building_id: Uuid) -> Self {
        Self { building_id: Some(building_id), ..Self::default() }
    }

    /// Whether `entity` passes this filter. Kinds without a building or floor
    /// never match a filter on that field.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        if !self.include_inactive && !entity.active {
            return false;
        }
        if let Some(building_id) = self.building_id {
            if entity.data.building_id() != Some(building_id) {
                return false;
            }
        }
        if let Some(floor) = self.floor {
            if entity.data.floor() != Some(floor) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
