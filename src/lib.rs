//! Campus map backend.
//!
//! A thin REST layer over a runtime-selected [`store::EntityStore`], plus the
//! services that sit between the shape builder and the store.
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Tagged entity kinds, validation, patch merge, list filters |
//! | [`store`] | Store trait and Postgres / in-memory / HTTP implementations |
//! | [`services`] | Draft submission, building cascades, admin sessions |
//! | [`routes`] | Axum router, admin auth, entity endpoints |
//! | [`config`] | Environment configuration |
//! | [`db`] | Pool setup and migrations |

pub mod config;
pub mod db;
pub mod model;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
