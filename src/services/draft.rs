//! Persist shapes drawn in the builder.
//!
//! DESIGN
//! ======
//! The builder emits an [`EntityInput`] (geometry only) once a shape closes.
//! A [`DraftTarget`] carries the form fields the admin filled in for the new
//! entity. [`submit`] joins the two into a [`NewEntity`] and hands it to the
//! store. The builder has already reset to idle by then, so a rejected
//! submission loses the drawing; the caller reports the error.

use builder::finalize::{EntityInput, ShapeKind};
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{Building, Entity, EntityData, EntityKind, Hallway, NewEntity, Room, ValidationError};
use crate::store::{EntityStore, StoreError};

/// Form fields for the entity a drawn shape becomes.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftTarget {
    Building { name: String, code: String, floors: u32 },
    Room { building_id: Option<Uuid>, floor: i32, room_number: String, name: String, room_type: String },
    Hallway { building_id: Option<Uuid>, floor: i32, name: String },
}

#[must_use]
pub fn entity_kind(kind: ShapeKind) -> EntityKind {
    match kind {
        ShapeKind::Building => EntityKind::Building,
        ShapeKind::Room => EntityKind::Room,
        ShapeKind::Hallway => EntityKind::Hallway,
    }
}

impl DraftTarget {
    #[must_use]
    pub fn shape_kind(&self) -> ShapeKind {
        match self {
            Self::Building { .. } => ShapeKind::Building,
            Self::Room { .. } => ShapeKind::Room,
            Self::Hallway { .. } => ShapeKind::Hallway,
        }
    }

    /// Report missing required fields before the admin starts drawing.
    ///
    /// # Errors
    ///
    /// `MissingField` for the first required field left empty.
    pub fn check(&self) -> Result<(), ValidationError> {
        let blank = EntityInput {
            kind: self.shape_kind(),
            map_position_x: 0.0,
            map_position_y: 0.0,
            size: None,
            custom_shape: None,
        };
        self.to_new_entity(&blank).validate()
    }

    /// Combine the form fields with the drawn geometry.
    #[must_use]
    pub fn to_new_entity(&self, input: &EntityInput) -> NewEntity {
        let x = input.map_position_x;
        let y = input.map_position_y;
        let width = input.size.map(|s| s.width);
        let height = input.size.map(|s| s.height);
        let description = input.custom_shape.clone().unwrap_or_default();

        match self.clone() {
            Self::Building { name, code, floors } => EntityData::Building(Building {
                name,
                code,
                floors,
                description,
                map_position_x: x,
                map_position_y: y,
                width,
                height,
            }),
            Self::Room { building_id, floor, room_number, name, room_type } => EntityData::Room(Room {
                building_id,
                floor,
                room_number,
                name,
                room_type,
                description,
                map_position_x: x,
                map_position_y: y,
                width,
                height,
            }),
            Self::Hallway { building_id, floor, name } => EntityData::Hallway(Hallway {
                building_id,
                floor,
                name,
                description,
                map_position_x: x,
                map_position_y: y,
                width,
                height,
            }),
        }
    }
}

/// Create the entity for a finished shape.
///
/// # Errors
///
/// `Validation` when the shape was drawn for a different kind than `target`,
/// otherwise whatever the store reports.
pub async fn submit(store: &dyn EntityStore, target: &DraftTarget, input: &EntityInput) -> Result<Entity, StoreError> {
    if target.shape_kind() != input.kind {
        return Err(ValidationError::KindMismatch {
            expected: entity_kind(target.shape_kind()),
            actual: entity_kind(input.kind),
        }
        .into());
    }

    match store.create_entity(target.to_new_entity(input)).await {
        Ok(entity) => {
            info!(id = %entity.id, kind = %entity.kind(), custom = input.custom_shape.is_some(), "draft saved");
            Ok(entity)
        }
        Err(e) => {
            warn!(error = %e, kind = input.kind.as_str(), "draft rejected");
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "draft_test.rs"]
mod tests;
