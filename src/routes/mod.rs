//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the admin auth endpoints, the entity collections and the visitor map
//! under one Axum router. Static `/api/auth/*` and `/api/map` paths take
//! priority over the `/api/{kind}` captures.

pub mod auth;
pub mod entities;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/map", get(entities::map))
        .route("/api/{kind}", get(entities::list_entities).post(entities::create_entity))
        .route(
            "/api/{kind}/{id}",
            get(entities::get_entity)
                .patch(entities::update_entity)
                .delete(entities::delete_entity),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
