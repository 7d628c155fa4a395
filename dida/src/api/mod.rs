//! Backend access.
//!
//! The stores depend on the [`TaskApi`], [`ProjectApi`] and [`AuthApi`]
//! traits rather than on HTTP directly; [`DidaApi`] implements all three
//! over the envelope-aware [`http::HttpClient`].

pub mod http;

use std::future::Future;

use dida_proto::auth::{LoginRequest, LoginResponse};
use dida_proto::envelope::EnvelopeError;
use dida_proto::project::{CreateProjectRequest, ProjectResponse};
use dida_proto::task::{
    CreateTaskRequest, TaskQuery, TaskResponse, TaskStatus, UpdateTaskRequest,
};

pub use http::{DEFAULT_REQUEST_TIMEOUT, HttpClient};

/// Errors returned by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered HTTP 401.
    #[error("unauthorized, please sign in again")]
    Unauthorized,

    /// The envelope carried a non-zero code.
    #[error("{message}")]
    Api {
        /// Code reported by the backend.
        code: i32,
        /// Human readable failure reason.
        message: String,
    },

    /// The body was not an envelope, or its payload had the wrong shape.
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A non-success HTTP status without an envelope body.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// A request path could not be joined onto the base URL.
    #[error("invalid request path {path}: {source}")]
    InvalidPath {
        /// Path that was attempted.
        path: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
}

impl From<EnvelopeError> for HttpError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Decode(e) => Self::Decode(e),
            EnvelopeError::Api { code, message } => Self::Api { code, message },
        }
    }
}

/// Task endpoints.
pub trait TaskApi: Send + Sync {
    /// Fetches every task in `status`.
    fn fetch_all_tasks(
        &self,
        status: TaskStatus,
    ) -> impl Future<Output = Result<Vec<TaskResponse>, HttpError>> + Send;

    /// Creates a task in a list project.
    fn fetch_create_task(
        &self,
        title: &str,
        project_id: &str,
    ) -> impl Future<Output = Result<TaskResponse, HttpError>> + Send;

    /// Moves a task to the trash.
    fn fetch_remove_task(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<TaskResponse, HttpError>> + Send;

    /// Marks a task as completed.
    fn fetch_complete_task(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<TaskResponse, HttpError>> + Send;

    /// Brings a completed or removed task back to active.
    fn fetch_restore_task(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<TaskResponse, HttpError>> + Send;

    /// Moves a task to another list project.
    fn fetch_move_task_to_project(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> impl Future<Output = Result<TaskResponse, HttpError>> + Send;
}

/// Project endpoints.
pub trait ProjectApi: Send + Sync {
    /// Fetches every list project.
    fn fetch_all_projects(
        &self,
    ) -> impl Future<Output = Result<Vec<ProjectResponse>, HttpError>> + Send;

    /// Creates a list project.
    fn fetch_create_project(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<ProjectResponse, HttpError>> + Send;
}

/// Sign-in endpoint.
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    fn fetch_login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<String, HttpError>> + Send;
}

/// The dida backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct DidaApi {
    http: HttpClient,
}

impl DidaApi {
    /// Wraps an HTTP client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    async fn update_task(
        &self,
        task_id: &str,
        update: &UpdateTaskRequest,
    ) -> Result<TaskResponse, HttpError> {
        self.http.patch(&format!("tasks/{task_id}"), update).await
    }
}

impl TaskApi for DidaApi {
    async fn fetch_all_tasks(&self, status: TaskStatus) -> Result<Vec<TaskResponse>, HttpError> {
        self.http
            .get_with_query("tasks", &TaskQuery { status })
            .await
    }

    async fn fetch_create_task(
        &self,
        title: &str,
        project_id: &str,
    ) -> Result<TaskResponse, HttpError> {
        let body = CreateTaskRequest {
            title: title.to_string(),
            project_id: project_id.to_string(),
        };
        self.http.post("tasks", &body).await
    }

    async fn fetch_remove_task(&self, task_id: &str) -> Result<TaskResponse, HttpError> {
        self.update_task(task_id, &UpdateTaskRequest::status(TaskStatus::Removed))
            .await
    }

    async fn fetch_complete_task(&self, task_id: &str) -> Result<TaskResponse, HttpError> {
        self.update_task(task_id, &UpdateTaskRequest::status(TaskStatus::Completed))
            .await
    }

    async fn fetch_restore_task(&self, task_id: &str) -> Result<TaskResponse, HttpError> {
        self.update_task(task_id, &UpdateTaskRequest::status(TaskStatus::Active))
            .await
    }

    async fn fetch_move_task_to_project(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<TaskResponse, HttpError> {
        self.update_task(task_id, &UpdateTaskRequest::move_to(project_id))
            .await
    }
}

impl ProjectApi for DidaApi {
    async fn fetch_all_projects(&self) -> Result<Vec<ProjectResponse>, HttpError> {
        self.http.get("projects").await
    }

    async fn fetch_create_project(&self, name: &str) -> Result<ProjectResponse, HttpError> {
        let body = CreateProjectRequest {
            name: name.to_string(),
        };
        self.http.post("projects", &body).await
    }
}

impl AuthApi for DidaApi {
    async fn fetch_login(&self, username: &str, password: &str) -> Result<String, HttpError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post("login", &body).await?;
        Ok(response.token)
    }
}
