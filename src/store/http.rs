//! REST client store.
//!
//! Speaks the `/api/{collection}` surface served by `routes`, so a remote
//! host (for example a native shell around the builder) can persist through
//! the same [`EntityStore`] trait as the server. Writes need an admin token,
//! obtained with [`HttpStore::login`] or supplied via [`HttpStore::with_token`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::model::{Entity, EntityKind, ListFilter, NewEntity};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Map a non-success response onto the store error it stands for.
pub(crate) fn status_error(status: u16, message: String, kind: EntityKind, id: Option<Uuid>) -> StoreError {
    match (status, id) {
        (400 | 422, _) => StoreError::Validation(message),
        (404, Some(id)) => StoreError::NotFound { kind, id },
        _ => StoreError::Server { status, message },
    }
}

fn network(err: &reqwest::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

impl HttpStore {
    /// Create an anonymous client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `Network` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| network(&e))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned(), token: None })
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Log in as the admin and return a client carrying the session token.
    ///
    /// # Errors
    ///
    /// `Server { status: 401, .. }` on bad credentials, `Network` on transport
    /// failure.
    pub async fn login(base_url: &str, email: &str, password: &str) -> Result<Self, StoreError> {
        #[derive(serde::Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let store = Self::new(base_url)?;
        let req = store
            .client
            .post(format!("{}/api/auth/login", store.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response = req.send().await.map_err(|e| network(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| network(&e))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "admin login rejected");
            return Err(StoreError::Server { status: status.as_u16(), message: body });
        }
        let login: LoginResponse = serde_json::from_str(&body)?;
        Ok(store.with_token(login.token))
    }

    fn url(&self, kind: EntityKind, id: Option<Uuid>) -> String {
        match id {
            Some(id) => format!("{}/api/{}/{id}", self.base_url, kind.collection()),
            None => format!("{}/api/{}", self.base_url, kind.collection()),
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send `req` and return the body of a success response.
    async fn send_raw(&self, req: RequestBuilder, kind: EntityKind, id: Option<Uuid>) -> Result<String, StoreError> {
        let response = self.authorized(req).send().await.map_err(|e| network(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| network(&e))?;
        debug!(status = status.as_u16(), %kind, "store request finished");
        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status.as_u16(), body, kind, id))
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        kind: EntityKind,
        id: Option<Uuid>,
    ) -> Result<T, StoreError> {
        let body = self.send_raw(req, kind, id).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl EntityStore for HttpStore {
    async fn create_entity(&self, new: NewEntity) -> Result<Entity, StoreError> {
        let kind = new.kind();
        let req = self.client.post(self.url(kind, None)).json(&new);
        self.send_json(req, kind, None).await
    }

    async fn list_entities(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Entity>, StoreError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(building_id) = filter.building_id {
            params.push(("buildingId", building_id.to_string()));
        }
        if let Some(floor) = filter.floor {
            params.push(("floor", floor.to_string()));
        }
        if filter.include_inactive {
            params.push(("includeInactive", "true".to_owned()));
        }
        let req = self.client.get(self.url(kind, None)).query(&params);
        self.send_json(req, kind, None).await
    }

    async fn get_entity(&self, kind: EntityKind, id: Uuid) -> Result<Entity, StoreError> {
        let req = self.client.get(self.url(kind, Some(id)));
        self.send_json(req, kind, Some(id)).await
    }

    async fn update_entity(&self, kind: EntityKind, id: Uuid, patch: serde_json::Value) -> Result<Entity, StoreError> {
        let req = self.client.patch(self.url(kind, Some(id))).json(&patch);
        self.send_json(req, kind, Some(id)).await
    }

    async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        let req = self.client.delete(self.url(kind, Some(id)));
        self.send_raw(req, kind, Some(id)).await?;
        Ok(())
    }

    async fn hard_delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        let req = self.client.delete(self.url(kind, Some(id))).query(&[("hard", "true")]);
        self.send_raw(req, kind, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
