//! In-process entity store.
//!
//! Entities live in a `HashMap` behind a tokio `RwLock`; each row carries a
//! monotonically increasing sequence number so listings keep creation order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::model::{Entity, EntityKind, ListFilter, NewEntity};

#[derive(Default)]
struct Rows {
    next_seq: u64,
    by_id: HashMap<Uuid, (u64, Entity)>,
}

impl Rows {
    fn get(&self, kind: EntityKind, id: Uuid) -> Result<&Entity, StoreError> {
        match self.by_id.get(&id) {
            Some((_, entity)) if entity.kind() == kind => Ok(entity),
            _ => Err(StoreError::NotFound { kind, id }),
        }
    }

    fn get_mut(&mut self, kind: EntityKind, id: Uuid) -> Result<&mut Entity, StoreError> {
        match self.by_id.get_mut(&id) {
            Some((_, entity)) if entity.kind() == kind => Ok(entity),
            _ => Err(StoreError::NotFound { kind, id }),
        }
    }
}

/// Cloneable handle; clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Rows>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_entity(&self, new: NewEntity) -> Result<Entity, StoreError> {
        new.validate()?;
        let entity = Entity { id: Uuid::new_v4(), active: true, data: new };

        let mut rows = self.rows.write().await;
        let seq = rows.next_seq;
        rows.next_seq += 1;
        rows.by_id.insert(entity.id, (seq, entity.clone()));

        info!(id = %entity.id, kind = %entity.kind(), "entity created");
        Ok(entity)
    }

    async fn list_entities(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Entity>, StoreError> {
        let rows = self.rows.read().await;
        let mut matched: Vec<&(u64, Entity)> = rows
            .by_id
            .values()
            .filter(|(_, entity)| entity.kind() == kind && filter.matches(entity))
            .collect();
        matched.sort_by_key(|(seq, _)| *seq);
        Ok(matched.into_iter().map(|(_, entity)| entity.clone()).collect())
    }

    async fn get_entity(&self, kind: EntityKind, id: Uuid) -> Result<Entity, StoreError> {
        let rows = self.rows.read().await;
        rows.get(kind, id).cloned()
    }

    async fn update_entity(&self, kind: EntityKind, id: Uuid, patch: serde_json::Value) -> Result<Entity, StoreError> {
        let mut rows = self.rows.write().await;
        let entity = rows.get_mut(kind, id)?;
        entity.data = entity.data.patched(&patch)?;
        info!(%id, %kind, "entity updated");
        Ok(entity.clone())
    }

    async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        rows.get_mut(kind, id)?.active = false;
        info!(%id, %kind, "entity deactivated");
        Ok(())
    }

    async fn hard_delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        rows.get(kind, id)?;
        rows.by_id.remove(&id);
        info!(%id, %kind, "entity removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
