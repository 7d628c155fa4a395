//! The task list and its mutations.
//!
//! Every mutation goes to the backend first; the local list only changes
//! once the request succeeded. Mutations that take a task out of the
//! current view (remove, complete, restore, move) also clear the active
//! task.

use std::sync::Arc;

use dida_proto::task::{TaskResponse, TaskStatus};
use parking_lot::RwLock;

use super::selector::{Selector, TasksSelector};
use super::{StoreError, TaskSource};
use crate::api::TaskApi;

/// A task as held by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Backend identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Free-form body.
    pub content: String,
    /// Current status.
    pub status: TaskStatus,
    /// Owning list project.
    pub project_id: String,
    /// Sort key inside the project.
    pub position: f64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<TaskResponse> for Task {
    fn from(response: TaskResponse) -> Self {
        Self {
            id: response.id,
            title: response.title,
            content: response.content,
            status: response.status,
            project_id: response.project_id,
            position: response.position,
            created_at: response.created_at,
            updated_at: response.updated_at,
        }
    }
}

/// Target of [`TasksStore::change_active_task`].
#[derive(Debug, Clone, Copy)]
pub enum ActiveTask<'a> {
    /// Activate this task as given.
    Task(&'a Task),
    /// Activate the listed task with this id.
    Id(&'a str),
}

impl<'a> From<&'a Task> for ActiveTask<'a> {
    fn from(task: &'a Task) -> Self {
        Self::Task(task)
    }
}

impl<'a> From<&'a str> for ActiveTask<'a> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

#[derive(Debug, Default)]
struct TasksState {
    tasks: Vec<Task>,
    current_active_task: Option<Task>,
}

/// The visible task list plus the task being edited.
pub struct TasksStore<A> {
    api: Arc<A>,
    selector: Arc<TasksSelector>,
    state: RwLock<TasksState>,
}

impl<A: TaskApi> TasksStore<A> {
    /// Creates an empty store.
    pub fn new(api: Arc<A>, selector: Arc<TasksSelector>) -> Self {
        Self {
            api,
            selector,
            state: RwLock::new(TasksState::default()),
        }
    }

    /// Snapshot of the visible tasks, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().tasks.clone()
    }

    /// The task currently being edited.
    pub fn current_active_task(&self) -> Option<Task> {
        self.state.read().current_active_task.clone()
    }

    /// Clears or replaces the active task directly.
    pub fn set_current_active_task(&self, task: Option<Task>) {
        self.state.write().current_active_task = task;
    }

    /// Creates a task in the selected list project.
    ///
    /// Does nothing and returns `Ok(None)` when no list project is
    /// selected; smart projects cannot receive new tasks. The new task is
    /// put at the head of the list and becomes the active task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the backend rejects the task.
    pub async fn add_task(&self, title: &str) -> Result<Option<Task>, StoreError> {
        let Some(project_id) = self.selector.current_list_project_id() else {
            tracing::debug!("no list project selected, task not added");
            return Ok(None);
        };

        let task = Task::from(self.api.fetch_create_task(title, &project_id).await?);
        let mut state = self.state.write();
        state.tasks.insert(0, task.clone());
        state.current_active_task = Some(task.clone());
        drop(state);

        tracing::debug!(task_id = %task.id, %project_id, "task added");
        Ok(Some(task))
    }

    /// Moves a task to the trash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the request fails.
    pub async fn remove_task(&self, task: &Task) -> Result<(), StoreError> {
        self.api.fetch_remove_task(&task.id).await?;
        self.drop_from_view(&task.id);
        Ok(())
    }

    /// Marks a task as completed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the request fails.
    pub async fn complete_task(&self, task: &Task) -> Result<(), StoreError> {
        self.api.fetch_complete_task(&task.id).await?;
        self.drop_from_view(&task.id);
        Ok(())
    }

    /// Brings a completed or removed task back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the request fails.
    pub async fn restore_task(&self, task: &Task) -> Result<(), StoreError> {
        self.api.fetch_restore_task(&task.id).await?;
        self.drop_from_view(&task.id);
        Ok(())
    }

    /// Moves a task to another list project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the request fails.
    pub async fn move_task_to_project(&self, task: &Task, project_id: &str) -> Result<(), StoreError> {
        self.api
            .fetch_move_task_to_project(&task.id, project_id)
            .await?;
        self.drop_from_view(&task.id);
        Ok(())
    }

    /// Replaces the list with tasks received from the backend.
    pub fn update_tasks(&self, raw: Vec<TaskResponse>) {
        self.state.write().tasks = raw.into_iter().map(Task::from).collect();
    }

    /// Makes a task the active one.
    ///
    /// An id that is not in the list clears the active task.
    pub fn change_active_task<'a>(&self, target: impl Into<ActiveTask<'a>>) {
        let mut state = self.state.write();
        state.current_active_task = match target.into() {
            ActiveTask::Task(task) => Some(task.clone()),
            ActiveTask::Id(id) => state.tasks.iter().find(|t| t.id == id).cloned(),
        };
    }

    /// Looks up a listed task by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] if no listed task has `id`.
    pub fn find_task(&self, id: &str) -> Result<Task, StoreError> {
        self.state
            .read()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))
    }

    /// Refreshes the list for the current selector.
    ///
    /// A list project shows its active tasks; a smart project shows all
    /// completed tasks; no selection shows nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the request fails.
    pub async fn load_tasks(&self) -> Result<(), StoreError> {
        let raw = match self.selector.current_selector() {
            Some(Selector::List(project)) => self
                .api
                .fetch_all_tasks(TaskStatus::Active)
                .await?
                .into_iter()
                .filter(|t| t.project_id == project.id)
                .collect(),
            Some(Selector::Smart(_)) => self.api.fetch_all_tasks(TaskStatus::Completed).await?,
            None => Vec::new(),
        };
        tracing::debug!(count = raw.len(), "tasks loaded");
        self.update_tasks(raw);
        Ok(())
    }

    fn drop_from_view(&self, task_id: &str) {
        let mut state = self.state.write();
        state.tasks.retain(|t| t.id != task_id);
        state.current_active_task = None;
    }
}

impl<A: TaskApi> TaskSource for TasksStore<A> {
    async fn find_all_tasks_not_removed(&self) -> Result<Vec<Task>, StoreError> {
        let (active, completed) = tokio::try_join!(
            self.api.fetch_all_tasks(TaskStatus::Active),
            self.api.fetch_all_tasks(TaskStatus::Completed),
        )?;
        Ok(active
            .into_iter()
            .chain(completed)
            .map(Task::from)
            .collect())
    }
}
