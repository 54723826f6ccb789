//! Postgres entity store.
//!
//! DESIGN
//! ======
//! All kinds share one `entities` table: the tagged [`EntityData`] document is
//! stored as JSONB next to `kind` and `active` columns. Building and floor
//! filters read the document's `buildingId`/`floor` keys, so no per-kind
//! schema is needed. Rows are listed by `created_at`, which defaults to
//! `clock_timestamp()` so rows created within one transaction still order.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::model::{Entity, EntityData, EntityKind, ListFilter, NewEntity};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn entity_from_row(row: &PgRow) -> Result<Entity, StoreError> {
    let data: serde_json::Value = row.try_get("data")?;
    Ok(Entity { id: row.try_get("id")?, active: row.try_get("active")?, data: serde_json::from_value::<EntityData>(data)? })
}

#[async_trait]
impl EntityStore for PgStore {
    async fn create_entity(&self, new: NewEntity) -> Result<Entity, StoreError> {
        new.validate()?;
        let entity = Entity { id: Uuid::new_v4(), active: true, data: new };
        let doc = serde_json::to_value(&entity.data)?;

        sqlx::query("INSERT INTO entities (id, kind, data, active) VALUES ($1, $2, $3, TRUE)")
            .bind(entity.id)
            .bind(entity.kind().as_str())
            .bind(doc)
            .execute(&self.pool)
            .await?;

        info!(id = %entity.id, kind = %entity.kind(), "entity created");
        Ok(entity)
    }

    async fn list_entities(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Entity>, StoreError> {
        let rows = sqlx::query(
            r"SELECT id, data, active
              FROM entities
              WHERE kind = $1
                AND ($2 OR active)
                AND ($3::text IS NULL OR data->>'buildingId' = $3)
                AND ($4::int IS NULL OR (data->>'floor')::int = $4)
              ORDER BY created_at, id",
        )
        .bind(kind.as_str())
        .bind(filter.include_inactive)
        .bind(filter.building_id.map(|id| id.to_string()))
        .bind(filter.floor)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(entity_from_row).collect()
    }

    async fn get_entity(&self, kind: EntityKind, id: Uuid) -> Result<Entity, StoreError> {
        let row = sqlx::query("SELECT id, data, active FROM entities WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { kind, id })?;
        entity_from_row(&row)
    }

    async fn update_entity(&self, kind: EntityKind, id: Uuid, patch: serde_json::Value) -> Result<Entity, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, data, active FROM entities WHERE id = $1 AND kind = $2 FOR UPDATE")
            .bind(id)
            .bind(kind.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound { kind, id })?;
        let mut entity = entity_from_row(&row)?;
        entity.data = entity.data.patched(&patch)?;

        sqlx::query("UPDATE entities SET data = $2, updated_at = clock_timestamp() WHERE id = $1")
            .bind(id)
            .bind(serde_json::to_value(&entity.data)?)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(%id, %kind, "entity updated");
        Ok(entity)
    }

    async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE entities SET active = FALSE, updated_at = clock_timestamp() WHERE id = $1 AND kind = $2")
                .bind(id)
                .bind(kind.as_str())
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { kind, id });
        }
        info!(%id, %kind, "entity deactivated");
        Ok(())
    }

    async fn hard_delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { kind, id });
        }
        info!(%id, %kind, "entity removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
