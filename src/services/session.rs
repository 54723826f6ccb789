//! Admin credentials and session tokens.
//!
//! ARCHITECTURE
//! ============
//! The dashboard has a single admin configured from the environment: an email
//! plus the hex SHA-256 of the password. A successful login mints a random
//! 32-byte hex token kept in an in-memory table with an expiry. Tokens die
//! with the process.
//!
//! TRADE-OFFS
//! ==========
//! Expired tokens are only swept when presented. The table stays small because
//! there is one admin and tokens are created on explicit login only.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::time::Instant;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Lowercase hex SHA-256 of `secret`.
#[must_use]
pub fn sha256_hex(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Whether `raw` is a 64-character hex digest.
#[must_use]
pub fn is_sha256_hex(raw: &str) -> bool {
    raw.len() == 64 && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

// =============================================================================
// ADMIN CREDENTIALS
// =============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub email: String,
    password_sha256: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials").field("email", &self.email).finish_non_exhaustive()
    }
}

impl AdminCredentials {
    /// `password_sha256` is normalized to lowercase.
    #[must_use]
    pub fn new(email: &str, password_sha256: &str) -> Self {
        Self { email: email.trim().to_ascii_lowercase(), password_sha256: password_sha256.trim().to_ascii_lowercase() }
    }

    /// Emails compare case-insensitively; the password is hashed and compared
    /// against the configured digest.
    #[must_use]
    pub fn verify(&self, email: &str, password: &str) -> bool {
        let email_ok = email.trim().eq_ignore_ascii_case(&self.email);
        let digest = sha256_hex(password);
        let password_ok = digest
            .bytes()
            .zip(self.password_sha256.bytes())
            .fold(digest.len() == self.password_sha256.len(), |acc, (a, b)| acc & (a == b));
        email_ok && password_ok
    }
}

// =============================================================================
// SESSIONS
// =============================================================================

/// Longest session lifetime a [`SessionStore`] will hand out.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// In-memory admin session table. Clones share the same table.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl SessionStore {
    /// `ttl` is capped at [`MAX_SESSION_TTL`].
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), ttl: ttl.min(MAX_SESSION_TTL) }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session, returning its token.
    pub async fn create(&self) -> String {
        let token = generate_token();
        let now = Instant::now();
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        self.sessions.write().await.insert(token.clone(), expires_at);
        token
    }

    /// Whether `token` names a live session. Expired sessions are dropped.
    pub async fn validate(&self, token: &str) -> bool {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return false,
                Some(expires_at) if *expires_at > now => return true,
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(token);
        false
    }

    pub async fn revoke(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
