//! Entity store adapters.
//!
//! DESIGN
//! ======
//! [`EntityStore`] is the plain CRUD seam between the map services and a
//! backing store selected at runtime. Implementations:
//!
//! - [`postgres::PgStore`]: one `entities` table of JSONB documents.
//! - [`memory::MemoryStore`]: process-local, for tests and demo deployments.
//! - [`http::HttpStore`]: a client of this server's own REST API.
//!
//! Stores validate input at the boundary (required fields and the
//! custom-shape position invariant) and list in creation order. Cascading
//! deletes are not a store concern; see `services::catalog`.

pub mod http;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Entity, EntityKind, ListFilter, NewEntity, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Uuid },
    #[error("network error: {0}")]
    Network(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// CRUD persistence for campus entities.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Validate and persist a new active entity.
    ///
    /// # Errors
    ///
    /// `Validation` for missing required fields or a custom shape whose
    /// position does not match its outline; transport/backend errors otherwise.
    async fn create_entity(&self, new: NewEntity) -> Result<Entity, StoreError>;

    /// Entities of `kind` passing `filter`, in creation order.
    ///
    /// # Errors
    ///
    /// Transport/backend errors.
    async fn list_entities(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Entity>, StoreError>;

    /// Fetch one entity, active or not.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entity of `kind` has `id`.
    async fn get_entity(&self, kind: EntityKind, id: Uuid) -> Result<Entity, StoreError>;

    /// Merge a JSON object patch and revalidate.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `Validation` when the patch touches `id`/`kind`/`active`
    /// or the merged entity is invalid.
    async fn update_entity(&self, kind: EntityKind, id: Uuid, patch: serde_json::Value) -> Result<Entity, StoreError>;

    /// Soft delete: mark the entity inactive.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entity of `kind` has `id`.
    async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError>;

    /// Remove the entity permanently.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entity of `kind` has `id`.
    async fn hard_delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError>;
}
