//! Record service HTTP client.
//!
//! Provides access to the JSON collections behind the admin lists.
//!
//! # API Reference
//!
//! - Base URL: configured origin, collections under `/api/<collection>`
//! - Authentication: optional `Authorization: Bearer <token>`
//! - List: `GET /api/<collection>` returns `{ <collection>: [...] }` or a bare array
//! - Update: `PUT /api/<collection>/{id}` returns the record, wrapped or bare
//! - Delete: `DELETE /api/<collection>/{id}` returns a status only

mod collection;
mod envelope;

pub use collection::{CollectionClient, RecordService};
pub use envelope::{decode_item, decode_list};

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::AdminConfig;
use crate::error::SyncError;

/// Record service API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RecordClient {
    inner: Arc<RecordClientInner>,
}

struct RecordClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl RecordClient {
    /// Create a new record service client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &AdminConfig) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| SyncError::Internal(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .user_agent(concat!("rollcall/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(RecordClientInner {
                client,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    /// Bind this client to one record collection.
    #[must_use]
    pub fn collection<R: rollcall_core::Record>(&self) -> CollectionClient<R> {
        CollectionClient::new(self.clone())
    }

    /// The configured service origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `<base>/api/<segments...>`, percent-encoding each segment.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, SyncError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SyncError::Internal("Base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request and return the JSON body.
    pub(crate) async fn get(&self, segments: &[&str]) -> Result<Value, SyncError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request with a JSON body and return the JSON body.
    pub(crate) async fn put<B: serde::Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, SyncError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "PUT");
        let response = self.inner.client.put(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request. Any success status counts; the body is ignored.
    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), SyncError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "DELETE");
        let response = self.inner.client.delete(url).send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response(response: reqwest::Response) -> Result<Value, SyncError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes).map_err(|e| SyncError::ServerRejection {
                status: status.as_u16(),
                message: format!("Malformed response body: {e}"),
            });
        }

        Err(Self::parse_error(response).await)
    }

    /// Build a rejection from an error response.
    ///
    /// Uses the JSON `message` or `error` field when the body has one.
    async fn parse_error(response: reqwest::Response) -> SyncError {
        let status = response.status();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return SyncError::NetworkFailure(e.to_string()),
        };

        SyncError::ServerRejection {
            status: status.as_u16(),
            message: error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string()),
        }
    }
}

impl std::fmt::Debug for RecordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Extract a human-readable message from an error body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return Some(message.clone());
            }
        }
    }

    Some(trimmed.to_string())
}
