//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the entity store chosen at startup, the admin credentials (if any),
//! and the admin session table. Clone is required by Axum; every field is
//! either `Arc`-backed or cheap to copy.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::session::{AdminCredentials, SessionStore};
use crate::store::EntityStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    /// `None` if admin login is not configured.
    pub admin: Option<AdminCredentials>,
    pub sessions: SessionStore,
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, config: &AppConfig) -> Self {
        Self {
            store,
            admin: config.admin.clone(),
            sessions: SessionStore::new(config.session_ttl),
            cookie_secure: config.cookie_secure,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
