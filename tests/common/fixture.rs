//! Shared fixtures for the client integration tests.

use std::sync::Arc;
use std::time::Duration;

use dida::api::HttpError;
use dida::command::{Command, CommandRegistry, CommandSearcher, SearchController, TaskSearcher};
use dida::store::{ListProject, ProjectLookup, StoreError, Task, TaskSource};
use dida_proto::task::TaskStatus;

pub fn live_list_project() -> ListProject {
    ListProject {
        id: "1".to_string(),
        name: "生活".to_string(),
    }
}

pub fn task(id: &str, title: &str, content: &str, status: TaskStatus) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        status,
        project_id: "1".to_string(),
        position: 0.0,
        created_at: "2023-01-01T00:00:00Z".to_string(),
        updated_at: "2023-01-01T00:00:00Z".to_string(),
    }
}

pub fn tasks() -> Vec<Task> {
    vec![
        task("0", "吃饭", "今天晚上吃什么", TaskStatus::Active),
        task("1", "运动", "跑步三公里", TaskStatus::Completed),
        task("2", "睡觉", "早点休息", TaskStatus::Active),
    ]
}

/// Returns [`tasks`] after an optional delay.
#[derive(Default)]
pub struct FixtureSource {
    pub delay: Duration,
}

impl TaskSource for FixtureSource {
    async fn find_all_tasks_not_removed(&self) -> Result<Vec<Task>, StoreError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(tasks())
    }
}

/// Always fails like a dropped session would.
pub struct FailingSource;

impl TaskSource for FailingSource {
    async fn find_all_tasks_not_removed(&self) -> Result<Vec<Task>, StoreError> {
        Err(StoreError::Http(HttpError::Unauthorized))
    }
}

/// Resolves every id to [`live_list_project`].
pub struct FixtureProjects;

impl ProjectLookup for FixtureProjects {
    fn find_project(&self, _project_id: &str) -> Option<ListProject> {
        Some(live_list_project())
    }
}

/// A registry with "前往主页" and an unnamed command.
pub fn registry() -> CommandRegistry {
    let registry = CommandRegistry::new();
    registry.add_command(Command::new("前往主页", || {}));
    registry.add_command(Command::new("", || {}));
    registry
}

pub fn controller_with<S: TaskSource + 'static>(source: S) -> SearchController<S, FixtureProjects> {
    SearchController::new(
        TaskSearcher::new(Arc::new(source), Arc::new(FixtureProjects)),
        CommandSearcher::new(registry()),
    )
}

pub fn controller() -> SearchController<FixtureSource, FixtureProjects> {
    controller_with(FixtureSource::default())
}
