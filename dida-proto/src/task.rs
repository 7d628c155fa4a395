//! Task payloads.
//!
//! Field names follow the backend's JSON: camelCase, with the identifier
//! exposed as `_id` and statuses as lowercase strings.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Open task shown in its project.
    Active,
    /// Finished task, grouped under the completed smart project.
    Completed,
    /// Soft-deleted task, kept in the trash.
    Removed,
}

impl TaskStatus {
    /// Wire representation, as used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Removed => "removed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Short title.
    pub title: String,
    /// Free-form body.
    #[serde(default)]
    pub content: String,
    /// Current status.
    pub status: TaskStatus,
    /// Owning list project.
    #[serde(default)]
    pub project_id: String,
    /// Sort key inside the project.
    #[serde(default)]
    pub position: f64,
    /// Creation timestamp, as formatted by the backend.
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp, as formatted by the backend.
    #[serde(default)]
    pub updated_at: String,
}

/// Query string for `GET /tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Only tasks in this status are returned.
    pub status: TaskStatus,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title of the new task.
    pub title: String,
    /// List project the task is created in.
    pub project_id: String,
}

/// Body of `PATCH /tasks/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New status (complete, restore, remove).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Target project for a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// New sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

impl UpdateTaskRequest {
    /// An update that only changes the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// An update that moves the task to another project.
    #[must_use]
    pub fn move_to(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }
}
