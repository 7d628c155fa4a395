//! HTTP surface of the development backend.
//!
//! Every handler answers with an [`ApiEnvelope`]: domain failures travel as
//! `code = -1` with HTTP 200, exactly like the production backend. Requests
//! to anything but `POST /login` need a bearer token issued by that
//! endpoint; a missing or unknown token is answered with a bare HTTP 401.

use std::collections::HashSet;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use dida_proto::auth::{LoginRequest, LoginResponse};
use dida_proto::envelope::{ApiEnvelope, CODE_ERROR};
use dida_proto::project::CreateProjectRequest;
use dida_proto::task::{CreateTaskRequest, TaskQuery, UpdateTaskRequest};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::store::TaskStore;

/// Account accepted by `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "dida-user".to_string(),
            password: "dida-password".to_string(),
        }
    }
}

/// Shared server state: storage, issued tokens, and the accepted account.
pub struct ServerState {
    /// Task and project storage.
    pub store: TaskStore,
    sessions: RwLock<HashSet<String>>,
    credentials: Credentials,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(Credentials::default())
    }
}

impl ServerState {
    /// Creates a state with an empty store accepting the given account.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            store: TaskStore::new(),
            sessions: RwLock::new(HashSet::new()),
            credentials,
        }
    }

    /// Issues a fresh token without going through `POST /login`.
    pub async fn issue_token(&self) -> String {
        let token = uuid::Uuid::now_v7().simple().to_string();
        self.sessions.write().await.insert(token.clone());
        token
    }

    /// Invalidates every issued token.
    pub async fn revoke_all(&self) {
        self.sessions.write().await.clear();
    }

    async fn is_valid(&self, token: &str) -> bool {
        self.sessions.read().await.contains(token)
    }
}

/// Builds the router with all dida endpoints.
pub fn router(state: Arc<ServerState>) -> axum::Router {
    axum::Router::new()
        .route("/login", post(login))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", patch(update_task))
        .route("/projects", get(list_projects).post(create_project))
        .with_state(state)
}

/// Starts the server on `addr` with a default state.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ServerState::default())).await
}

/// Starts the server on `addr` with a pre-built [`ServerState`].
///
/// Binding to port 0 picks a free port; the bound address is returned with
/// the task driving the server.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<ServerState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "dida server error");
        }
    });

    Ok((bound_addr, handle))
}

fn ok<T: Serialize>(data: T) -> Response {
    Json(ApiEnvelope::ok(data)).into_response()
}

fn fail(message: impl Into<String>) -> Response {
    Json(ApiEnvelope::error(CODE_ERROR, message)).into_response()
}

/// Rejects the request with a bare 401 unless it carries a known token.
async fn authorize(state: &ServerState, headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if state.is_valid(token).await => Ok(()),
        _ => {
            tracing::debug!("rejecting request without a valid token");
            Err(StatusCode::UNAUTHORIZED.into_response())
        }
    }
}

async fn login(State(state): State<Arc<ServerState>>, Json(body): Json<LoginRequest>) -> Response {
    if body.username != state.credentials.username || body.password != state.credentials.password {
        tracing::info!(username = %body.username, "rejected sign-in");
        return fail("用户名或密码错误");
    }
    let token = state.issue_token().await;
    tracing::info!(username = %body.username, "signed in");
    ok(LoginResponse { token })
}

async fn list_tasks(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Query(query): Query<TaskQuery>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers).await {
        return rejection;
    }
    ok(state.store.list_tasks(query.status).await)
}

async fn create_task(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<CreateTaskRequest>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers).await {
        return rejection;
    }
    match state.store.create_task(body).await {
        Ok(task) => ok(task),
        Err(e) => fail(e.to_string()),
    }
}

async fn update_task(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers).await {
        return rejection;
    }
    match state.store.update_task(&id, body).await {
        Ok(task) => ok(task),
        Err(e) => fail(e.to_string()),
    }
}

async fn list_projects(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&state, &headers).await {
        return rejection;
    }
    ok(state.store.list_projects().await)
}

async fn create_project(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<CreateProjectRequest>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers).await {
        return rejection;
    }
    match state.store.create_project(&body.name).await {
        Ok(project) => ok(project),
        Err(e) => fail(e.to_string()),
    }
}
