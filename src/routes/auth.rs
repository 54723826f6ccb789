//! Admin auth routes: login, logout, current session.

use axum::extract::{FromRef, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// A live admin session, from `Authorization: Bearer` or the session cookie.
/// Use as a handler parameter to require the admin.
pub struct AdminSession {
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AdminSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = bearer_token(&parts.headers)
            .or_else(|| jar.get(COOKIE_NAME).map(Cookie::value))
            .unwrap_or_default()
            .to_owned();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        if !app_state.sessions.validate(&token).await {
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Self { token })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

fn session_cookie(value: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// `POST /api/auth/login` — check admin credentials, set the session cookie.
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Response {
    let Some(admin) = &state.admin else {
        return (StatusCode::SERVICE_UNAVAILABLE, "admin login not configured").into_response();
    };
    if !admin.verify(&body.email, &body.password) {
        warn!("admin login rejected");
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    }

    let token = state.sessions.create().await;
    let max_age = Duration::try_from(state.sessions.ttl()).unwrap_or(Duration::MAX);
    let jar = CookieJar::new().add(session_cookie(token.clone(), state.cookie_secure, max_age));
    info!(email = %admin.email, "admin logged in");
    (jar, Json(serde_json::json!({ "token": token }))).into_response()
}

/// `GET /api/auth/me` — the logged-in admin.
pub async fn me(State(state): State<AppState>, _session: AdminSession) -> Json<serde_json::Value> {
    let email = state.admin.as_ref().map(|a| a.email.clone());
    Json(serde_json::json!({ "email": email, "role": "admin" }))
}

/// `POST /api/auth/logout` — drop the session, clear the cookie.
pub async fn logout(State(state): State<AppState>, session: AdminSession) -> impl IntoResponse {
    state.sessions.revoke(&session.token).await;
    let jar = CookieJar::new().add(session_cookie(String::new(), state.cookie_secure, Duration::ZERO));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
