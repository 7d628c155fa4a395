//! In-memory task and project storage.
//!
//! [`TaskStore`] is the backend's only source of truth. Tasks are never
//! physically deleted; removal flips their status to
//! [`TaskStatus::Removed`] so they can be restored.

use dida_proto::project::ProjectResponse;
use dida_proto::task::{CreateTaskRequest, TaskResponse, TaskStatus, UpdateTaskRequest};
use tokio::sync::RwLock;

/// Errors reported to clients as envelope failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Task title cannot be empty.
    #[error("task title cannot be empty")]
    EmptyTitle,
    /// Project name cannot be empty.
    #[error("project name cannot be empty")]
    EmptyProjectName,
    /// No project with the given id.
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    /// No task with the given id.
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

/// Thread-safe in-memory store for tasks and projects.
pub struct TaskStore {
    tasks: RwLock<Vec<TaskResponse>>,
    projects: RwLock<Vec<ProjectResponse>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            projects: RwLock::new(Vec::new()),
        }
    }

    /// Returns all tasks in the given status, in insertion order.
    pub async fn list_tasks(&self, status: TaskStatus) -> Vec<TaskResponse> {
        let tasks = self.tasks.read().await;
        tasks.iter().filter(|t| t.status == status).cloned().collect()
    }

    /// Creates an active task in an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyTitle`] for a blank title, or
    /// [`StoreError::ProjectNotFound`] if the project does not exist.
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<TaskResponse, StoreError> {
        if request.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if !self.has_project(&request.project_id).await {
            return Err(StoreError::ProjectNotFound(request.project_id));
        }

        let mut tasks = self.tasks.write().await;
        #[allow(clippy::cast_precision_loss)]
        let position = (tasks.len() + 1) as f64;
        let timestamp = now();
        let task = TaskResponse {
            id: new_id(),
            title: request.title,
            content: String::new(),
            status: TaskStatus::Active,
            project_id: request.project_id,
            position,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        tasks.push(task.clone());
        drop(tasks);

        tracing::debug!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Applies a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] for an unknown id,
    /// [`StoreError::ProjectNotFound`] when moving to an unknown project, or
    /// [`StoreError::EmptyTitle`] when renaming to a blank title.
    pub async fn update_task(
        &self,
        id: &str,
        update: UpdateTaskRequest,
    ) -> Result<TaskResponse, StoreError> {
        if let Some(project_id) = &update.project_id
            && !self.has_project(project_id).await
        {
            return Err(StoreError::ProjectNotFound(project_id.clone()));
        }
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(StoreError::EmptyTitle);
        }

        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;

        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(content) = update.content {
            task.content = content;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(project_id) = update.project_id {
            task.project_id = project_id;
        }
        if let Some(position) = update.position {
            task.position = position;
        }
        task.updated_at = now();

        tracing::debug!(task_id = %task.id, status = %task.status, "task updated");
        Ok(task.clone())
    }

    /// Returns all projects in creation order.
    pub async fn list_projects(&self) -> Vec<ProjectResponse> {
        self.projects.read().await.clone()
    }

    /// Creates a list project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyProjectName`] for a blank name.
    pub async fn create_project(&self, name: &str) -> Result<ProjectResponse, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyProjectName);
        }
        let project = ProjectResponse {
            id: new_id(),
            name: name.to_string(),
        };
        self.projects.write().await.push(project.clone());
        Ok(project)
    }

    /// Fills the store with a small demo data set.
    ///
    /// # Errors
    ///
    /// Propagates any [`StoreError`] from the underlying inserts.
    pub async fn seed_demo(&self) -> Result<(), StoreError> {
        let life = self.create_project("生活").await?;
        let work = self.create_project("工作").await?;

        for (title, project) in [("吃饭", &life), ("运动", &life), ("写周报", &work)] {
            self.create_task(CreateTaskRequest {
                title: title.to_string(),
                project_id: project.id.clone(),
            })
            .await?;
        }

        let tasks = self.list_tasks(TaskStatus::Active).await;
        if let Some(sport) = tasks.iter().find(|t| t.title == "运动") {
            self.update_task(&sport.id, UpdateTaskRequest::status(TaskStatus::Completed))
                .await?;
        }
        if let Some(meal) = tasks.iter().find(|t| t.title == "吃饭") {
            self.update_task(
                &meal.id,
                UpdateTaskRequest {
                    content: Some("今天晚上吃什么".to_string()),
                    ..UpdateTaskRequest::default()
                },
            )
            .await?;
        }
        Ok(())
    }

    async fn has_project(&self, project_id: &str) -> bool {
        self.projects
            .read()
            .await
            .iter()
            .any(|p| p.id == project_id)
    }
}
