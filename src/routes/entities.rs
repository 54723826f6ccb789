//! Entity REST routes: `/api/{collection}` CRUD and the visitor map.
//!
//! Reads are public; writes need an [`AdminSession`]. Store errors map onto
//! statuses in [`store_error_to_status`]; client errors carry the store's
//! message, server errors are logged and answered with the status reason.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use crate::model::{Entity, EntityKind, ListFilter, NewEntity};
use crate::routes::auth::AdminSession;
use crate::services::catalog::{self, CampusMap};
use crate::state::AppState;
use crate::store::StoreError;

pub type ApiError = (StatusCode, String);

pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Network(_) | StoreError::Server { .. } => StatusCode::BAD_GATEWAY,
        StoreError::Database(_) | StoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: StoreError) -> ApiError {
    let status = store_error_to_status(&err);
    if status.is_server_error() {
        error!(error = %err, "store request failed");
        return (status, status.canonical_reason().unwrap_or("error").to_owned());
    }
    (status, err.to_string())
}

fn parse_kind(raw: &str) -> Result<EntityKind, ApiError> {
    EntityKind::from_collection(raw).ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown collection: {raw}")))
}

/// Read a create body for `kind`. The `kind` tag may be omitted; `id` and
/// `active` are assigned by the store and ignored here.
pub(crate) fn new_entity_from_body(kind: EntityKind, mut body: Value) -> Result<NewEntity, StoreError> {
    let Some(fields) = body.as_object_mut() else {
        return Err(StoreError::Validation("body must be a JSON object".into()));
    };
    let tagged = fields.get("kind").and_then(Value::as_str).map(str::to_owned);
    match tagged {
        None => {
            fields.insert("kind".into(), Value::from(kind.as_str()));
        }
        Some(tag) if tag == kind.as_str() => {}
        Some(tag) => return Err(StoreError::Validation(format!("expected {kind}, got {tag}"))),
    }
    fields.remove("id");
    fields.remove("active");
    serde_json::from_value(body).map_err(|e| StoreError::Validation(e.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub hard: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQuery {
    pub building_id: Option<Uuid>,
    pub floor: Option<i32>,
}

/// `GET /api/{kind}` — list entities, active only unless `includeInactive`.
pub async fn list_entities(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<Entity>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let entities = state.store.list_entities(kind, &filter).await.map_err(api_error)?;
    Ok(Json(entities))
}

/// `POST /api/{kind}` — create an entity.
pub async fn create_entity(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Entity>), ApiError> {
    let kind = parse_kind(&kind)?;
    let new = new_entity_from_body(kind, body).map_err(api_error)?;
    let entity = state.store.create_entity(new).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// `GET /api/{kind}/{id}` — fetch one entity.
pub async fn get_entity(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<Entity>, ApiError> {
    let kind = parse_kind(&kind)?;
    let entity = state.store.get_entity(kind, id).await.map_err(api_error)?;
    Ok(Json(entity))
}

/// `PATCH /api/{kind}/{id}` — merge a JSON object patch.
pub async fn update_entity(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(patch): Json<Value>,
) -> Result<Json<Entity>, ApiError> {
    let kind = parse_kind(&kind)?;
    let entity = state.store.update_entity(kind, id, patch).await.map_err(api_error)?;
    Ok(Json(entity))
}

/// `DELETE /api/{kind}/{id}[?hard=true]` — soft delete by default. Building
/// deletes cascade to the building's rooms and hallways.
pub async fn delete_entity(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((kind, id)): Path<(String, Uuid)>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    let store = state.store.as_ref();
    match (kind, query.hard) {
        (EntityKind::Building, hard) => {
            catalog::delete_building(store, id, hard).await.map_err(api_error)?;
        }
        (_, true) => store.hard_delete_entity(kind, id).await.map_err(api_error)?,
        (_, false) => store.delete_entity(kind, id).await.map_err(api_error)?,
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/map` — active buildings, rooms and hallways for the visitor map.
pub async fn map(State(state): State<AppState>, Query(query): Query<MapQuery>) -> Result<Json<CampusMap>, ApiError> {
    let map = catalog::campus_map(state.store.as_ref(), query.building_id, query.floor)
        .await
        .map_err(api_error)?;
    Ok(Json(map))
}

#[cfg(test)]
#[path = "entities_test.rs"]
mod tests;
