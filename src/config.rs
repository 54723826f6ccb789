//! Server configuration parsed from environment variables.
//!
//! `main` loads `.env` with `dotenvy` first, then calls
//! [`AppConfig::from_env`]. Parsing goes through [`AppConfig::from_lookup`] so
//! tests can feed a map instead of mutating process env.

use std::time::Duration;

use crate::services::session::{AdminCredentials, MAX_SESSION_TTL, is_sha256_hex};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// `None` disables admin login.
    pub admin: Option<AdminCredentials>,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("DATABASE_URL is required when STORE_BACKEND=postgres")]
    MissingDatabaseUrl,
    #[error("ADMIN_EMAIL and ADMIN_PASSWORD_SHA256 must be set together")]
    PartialAdmin,
}

impl AppConfig {
    /// Build config from process environment.
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable values or inconsistent combinations.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable values or inconsistent combinations.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let store_backend = parse_backend(get("STORE_BACKEND").as_deref(), database_url.is_some())?;
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let admin = parse_admin(get("ADMIN_EMAIL").as_deref(), get("ADMIN_PASSWORD_SHA256").as_deref())?;
        let cookie_secure = match get("COOKIE_SECURE") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "COOKIE_SECURE", value: raw })?,
        };

        let session_ttl_secs = parse_or("SESSION_TTL_SECS", get("SESSION_TTL_SECS").as_deref(), DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs > MAX_SESSION_TTL.as_secs() {
            return Err(ConfigError::Invalid { var: "SESSION_TTL_SECS", value: session_ttl_secs.to_string() });
        }

        Ok(Self {
            port: parse_or("PORT", get("PORT").as_deref(), DEFAULT_PORT)?,
            store_backend,
            database_url,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS").as_deref(), DEFAULT_DB_MAX_CONNECTIONS)?,
            admin,
            session_ttl: Duration::from_secs(session_ttl_secs),
            cookie_secure,
        })
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<&str>, default: T) -> Result<T, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value: value.to_owned() }),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_backend(raw: Option<&str>, has_database_url: bool) -> Result<StoreBackend, ConfigError> {
    let default = if has_database_url { "postgres" } else { "memory" };
    match raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default) {
        "postgres" => Ok(StoreBackend::Postgres),
        "memory" => Ok(StoreBackend::Memory),
        other => Err(ConfigError::Invalid { var: "STORE_BACKEND", value: other.to_owned() }),
    }
}

fn parse_admin(email: Option<&str>, password_sha256: Option<&str>) -> Result<Option<AdminCredentials>, ConfigError> {
    let email = email.map(str::trim).filter(|v| !v.is_empty());
    let digest = password_sha256.map(str::trim).filter(|v| !v.is_empty());
    match (email, digest) {
        (None, None) => Ok(None),
        (Some(email), Some(digest)) => {
            if !email.contains('@') {
                return Err(ConfigError::Invalid { var: "ADMIN_EMAIL", value: email.to_owned() });
            }
            if !is_sha256_hex(digest) {
                return Err(ConfigError::Invalid { var: "ADMIN_PASSWORD_SHA256", value: "<redacted>".to_owned() });
            }
            Ok(Some(AdminCredentials::new(email, digest)))
        }
        _ => Err(ConfigError::PartialAdmin),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
