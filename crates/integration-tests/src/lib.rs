//! Integration tests for Rollcall.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rollcall-integration-tests
//! ```
//!
//! Each test starts a [`FakeRecordService`] on `127.0.0.1:0` and drives the
//! real HTTP client and list store against it. No external service is needed.
//!
//! # Wire shapes
//!
//! The fake mirrors the production service's quirks:
//!
//! - `GET /api/members` wraps the list as `{ "members": [...] }`
//! - `GET /api/user` returns a bare array
//! - `PUT /api/members/{id}` wraps the record as `{ "message", "member" }`
//! - `PUT /api/user/{id}` returns the bare record
//! - `DELETE` answers `204 No Content`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rollcall_admin::{AdminConfig, RecordClient};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Path segment of the member collection.
pub const MEMBERS: &str = "members";

/// Path segment of the user collection.
pub const USERS: &str = "user";

/// One request as the fake service saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Raw request path, still percent-encoded.
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// An injected failure for the next matching request.
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    /// Raw response body.
    pub body: String,
}

impl Failure {
    /// A failure with a `{ "message": ... }` body.
    #[must_use]
    pub fn json(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "message": message }).to_string(),
        }
    }
}

struct Collection {
    records: Vec<Value>,
    list_field: Option<&'static str>,
    item_field: Option<&'static str>,
}

#[derive(Default)]
struct FakeState {
    collections: HashMap<&'static str, Collection>,
    requests: Vec<RecordedRequest>,
    failures: Vec<Failure>,
    /// Replaces the next list response body verbatim.
    raw_list: Option<Value>,
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process stand-in for the record service.
pub struct FakeRecordService {
    addr: SocketAddr,
    state: Shared,
    task: JoinHandle<()>,
}

impl FakeRecordService {
    /// Start serving `members` and `users` on an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn start(members: Vec<Value>, users: Vec<Value>) -> std::io::Result<Self> {
        let mut collections = HashMap::new();
        collections.insert(
            MEMBERS,
            Collection {
                records: members,
                list_field: Some("members"),
                item_field: Some("member"),
            },
        );
        collections.insert(
            USERS,
            Collection {
                records: users,
                list_field: None,
                item_field: None,
            },
        );
        let state: Shared = Arc::new(Mutex::new(FakeState {
            collections,
            ..FakeState::default()
        }));

        let app = Router::new()
            .route("/api/{collection}", get(list))
            .route("/api/{collection}/{id}", axum::routing::put(update).delete(remove))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state, task })
    }

    /// Origin the fake is listening on.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at the fake.
    ///
    /// # Errors
    ///
    /// Returns error if the origin is rejected.
    pub fn config(&self) -> Result<AdminConfig, rollcall_admin::ConfigError> {
        AdminConfig::default().with_base_url(&self.base_url())
    }

    /// HTTP client pointing at the fake.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be built.
    pub fn client(&self) -> Result<RecordClient, Box<dyn std::error::Error>> {
        Ok(RecordClient::new(&self.config()?)?)
    }

    /// Fail the next request with `failure`. Failures queue up in order.
    pub fn fail_next(&self, failure: Failure) {
        lock(&self.state).failures.push(failure);
    }

    /// Answer the next list request with `body` instead of the collection.
    pub fn next_list_body(&self, body: Value) {
        lock(&self.state).raw_list = Some(body);
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests received with `method`.
    #[must_use]
    pub fn requests_with(&self, method: &Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| &r.method == method)
            .collect()
    }

    /// Current server-side records of `collection`.
    #[must_use]
    pub fn records(&self, collection: &str) -> Vec<Value> {
        lock(&self.state)
            .collections
            .get(collection)
            .map(|c| c.records.clone())
            .unwrap_or_default()
    }
}

impl Drop for FakeRecordService {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn record(state: &mut FakeState, method: Method, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
    state.requests.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        body,
    });
}

fn take_failure(state: &mut FakeState) -> Option<Response> {
    if state.failures.is_empty() {
        return None;
    }
    let failure = state.failures.remove(0);
    Some((failure.status, failure.body).into_response())
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{what} not found") })),
    )
        .into_response()
}

fn id_of(record: &Value) -> Option<&str> {
    record.get("_id").and_then(Value::as_str)
}

async fn list(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&state);
    record(&mut state, Method::GET, &uri, &headers, None);
    if let Some(response) = take_failure(&mut state) {
        return response;
    }
    if let Some(body) = state.raw_list.take() {
        return Json(body).into_response();
    }

    let Some(collection) = state.collections.get(collection.as_str()) else {
        return not_found("Collection");
    };
    let items = Value::Array(collection.records.clone());
    match collection.list_field {
        Some(field) => Json(json!({ field: items })).into_response(),
        None => Json(items).into_response(),
    }
}

async fn update(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let mut state = lock(&state);
    record(
        &mut state,
        Method::PUT,
        &uri,
        &headers,
        Some(Value::Object(body.clone())),
    );
    if let Some(response) = take_failure(&mut state) {
        return response;
    }

    let Some(collection) = state.collections.get_mut(collection.as_str()) else {
        return not_found("Collection");
    };
    let Some(existing) = collection
        .records
        .iter_mut()
        .find(|r| id_of(r) == Some(id.as_str()))
    else {
        return not_found("Record");
    };
    if let Value::Object(fields) = existing {
        fields.extend(body);
    }

    let updated = existing.clone();
    match collection.item_field {
        Some(field) => Json(json!({ "message": "Updated", field: updated })).into_response(),
        None => Json(updated).into_response(),
    }
}

async fn remove(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&state);
    record(&mut state, Method::DELETE, &uri, &headers, None);
    if let Some(response) = take_failure(&mut state) {
        return response;
    }

    let Some(collection) = state.collections.get_mut(collection.as_str()) else {
        return not_found("Collection");
    };
    let before = collection.records.len();
    collection.records.retain(|r| id_of(r) != Some(id.as_str()));
    if collection.records.len() == before {
        return not_found("Record");
    }
    StatusCode::NO_CONTENT.into_response()
}
