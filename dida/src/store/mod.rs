//! Client-side state for tasks and projects.
//!
//! The stores cache what the backend returned and keep the visible lists in
//! step with the mutations the user performs. The search core only needs
//! two narrow views of them, [`TaskSource`] and [`ProjectLookup`], so it
//! can be driven by fixtures in tests.

pub mod projects;
pub mod selector;
pub mod tasks;

use std::future::Future;

pub use projects::{COMPLETE_SMART_PROJECT, ListProject, ProjectsStore, SmartProject};
pub use selector::{Selector, TasksSelector};
pub use tasks::{ActiveTask, Task, TasksStore};

use crate::api::HttpError;

/// Errors raised by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend call failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The task is not in the local list.
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

/// Anything that can produce the full set of tasks that are not removed.
pub trait TaskSource: Send + Sync {
    /// Returns active and completed tasks, excluding removed ones.
    fn find_all_tasks_not_removed(
        &self,
    ) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;
}

/// Lookup of list projects by id.
pub trait ProjectLookup: Send + Sync {
    /// Returns the project with `project_id`, if known.
    fn find_project(&self, project_id: &str) -> Option<ListProject>;
}
