//! List projects and the synthetic smart projects.

use std::sync::Arc;

use dida_proto::project::ProjectResponse;
use parking_lot::RwLock;

use super::{ProjectLookup, StoreError};
use crate::api::ProjectApi;

/// A user-created project tasks live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProject {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl From<ProjectResponse> for ListProject {
    fn from(response: ProjectResponse) -> Self {
        Self {
            id: response.id,
            name: response.name,
        }
    }
}

/// A synthetic project grouping tasks by state rather than ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartProject {
    /// Display name.
    pub name: &'static str,
}

/// Pseudo-project every completed task is shown under.
pub const COMPLETE_SMART_PROJECT: SmartProject = SmartProject { name: "已完成" };

/// Cache of the user's list projects.
pub struct ProjectsStore<A> {
    api: Arc<A>,
    projects: RwLock<Vec<ListProject>>,
}

impl<A: ProjectApi> ProjectsStore<A> {
    /// Creates an empty store backed by `api`.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            projects: RwLock::new(Vec::new()),
        }
    }

    /// Loads all projects from the backend, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the request fails.
    pub async fn init(&self) -> Result<(), StoreError> {
        let projects: Vec<ListProject> = self
            .api
            .fetch_all_projects()
            .await?
            .into_iter()
            .map(ListProject::from)
            .collect();
        tracing::debug!(count = projects.len(), "projects loaded");
        *self.projects.write() = projects;
        Ok(())
    }

    /// Creates a project and appends it to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the request fails.
    pub async fn create_project(&self, name: &str) -> Result<ListProject, StoreError> {
        let project = ListProject::from(self.api.fetch_create_project(name).await?);
        self.projects.write().push(project.clone());
        Ok(project)
    }

    /// Snapshot of the cached projects.
    pub fn projects(&self) -> Vec<ListProject> {
        self.projects.read().clone()
    }
}

impl<A: ProjectApi> ProjectLookup for ProjectsStore<A> {
    fn find_project(&self, project_id: &str) -> Option<ListProject> {
        self.projects
            .read()
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
    }
}
