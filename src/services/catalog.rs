//! Cross-entity operations over an [`EntityStore`].
//!
//! ERROR HANDLING
//! ==============
//! Building deletes cascade through individual store calls (rooms, then
//! hallways, then the building) and are not atomic. A failure stops the
//! cascade and is returned as-is; entities already deleted stay deleted and
//! the building remains, so retrying the delete finishes the job.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::model::{Entity, EntityKind, ListFilter};
use crate::store::{EntityStore, StoreError};

/// What a building delete removed besides the building itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub rooms: usize,
    pub hallways: usize,
}

/// Everything the visitor map draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampusMap {
    pub buildings: Vec<Entity>,
    pub rooms: Vec<Entity>,
    pub hallways: Vec<Entity>,
}

/// Delete a building and its rooms and hallways.
///
/// Soft deletes deactivate active dependents; hard deletes remove every
/// dependent, including already-inactive ones.
///
/// # Errors
///
/// `NotFound` if the building does not exist; otherwise the first failing
/// store call.
pub async fn delete_building(store: &dyn EntityStore, id: Uuid, hard: bool) -> Result<CascadeSummary, StoreError> {
    store.get_entity(EntityKind::Building, id).await?;

    let filter = ListFilter { building_id: Some(id), floor: None, include_inactive: hard };
    let mut summary = CascadeSummary::default();

    for kind in [EntityKind::Room, EntityKind::Hallway] {
        let dependents = store.list_entities(kind, &filter).await?;
        for dependent in &dependents {
            remove(store, kind, dependent.id, hard).await?;
        }
        match kind {
            EntityKind::Room => summary.rooms = dependents.len(),
            _ => summary.hallways = dependents.len(),
        }
    }

    remove(store, EntityKind::Building, id, hard).await?;
    info!(%id, hard, rooms = summary.rooms, hallways = summary.hallways, "building deleted");
    Ok(summary)
}

async fn remove(store: &dyn EntityStore, kind: EntityKind, id: Uuid, hard: bool) -> Result<(), StoreError> {
    if hard {
        store.hard_delete_entity(kind, id).await
    } else {
        store.delete_entity(kind, id).await
    }
}

/// Active buildings, rooms and hallways. `building_id`/`floor` narrow rooms
/// and hallways only.
///
/// # Errors
///
/// The first failing store call.
pub async fn campus_map(
    store: &dyn EntityStore,
    building_id: Option<Uuid>,
    floor: Option<i32>,
) -> Result<CampusMap, StoreError> {
    let outer = ListFilter::default();
    let inner = ListFilter { building_id, floor, include_inactive: false };
    let (buildings, rooms, hallways) = tokio::try_join!(
        store.list_entities(EntityKind::Building, &outer),
        store.list_entities(EntityKind::Room, &inner),
        store.list_entities(EntityKind::Hallway, &inner),
    )?;
    Ok(CampusMap { buildings, rooms, hallways })
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
