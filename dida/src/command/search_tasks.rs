//! Fuzzy search over every task that is not in the trash.

use std::sync::Arc;

use dida_proto::task::TaskStatus;
use tokio::sync::watch;

use super::fuzzy::{FuzzySearch, Key, SearchResultItem};
use crate::store::{COMPLETE_SMART_PROJECT, ProjectLookup, StoreError, Task, TaskSource};

const TASK_KEYS: &[Key<Task>] = &[|t| t.title.as_str(), |t| t.content.as_str()];

/// The project a search hit is shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFrom {
    /// Display name.
    pub name: String,
}

/// A task decorated for display in the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTask {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub project_id: String,
    /// True for completed tasks.
    pub done: bool,
    /// Owning list project, or the completed smart project for done tasks.
    /// `None` when the project is unknown.
    pub from: Option<TaskFrom>,
}

/// Searches tasks from a [`TaskSource`] and publishes enriched hits.
pub struct TaskSearcher<S, P> {
    source: Arc<S>,
    projects: Arc<P>,
    fuzzy: FuzzySearch,
    filtered: watch::Sender<Vec<SearchResultItem<EnrichedTask>>>,
}

impl<S: TaskSource, P: ProjectLookup> TaskSearcher<S, P> {
    pub fn new(source: Arc<S>, projects: Arc<P>) -> Self {
        Self {
            source,
            projects,
            fuzzy: FuzzySearch::new(),
            filtered: watch::Sender::new(Vec::new()),
        }
    }

    /// Searches and publishes the hits for `query`.
    ///
    /// A blank query clears the results without fetching.
    ///
    /// # Errors
    ///
    /// Returns the source's error when fetching tasks fails; the published
    /// results are left untouched in that case.
    pub async fn search_tasks(&self, query: &str) -> Result<(), StoreError> {
        let hits = self.find_matches(query).await?;
        self.publish(hits);
        Ok(())
    }

    /// Computes the hits for `query` without publishing them.
    ///
    /// # Errors
    ///
    /// Returns the source's error when fetching tasks fails.
    pub async fn find_matches(
        &self,
        query: &str,
    ) -> Result<Vec<SearchResultItem<EnrichedTask>>, StoreError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks = self.source.find_all_tasks_not_removed().await?;
        let hits = self
            .fuzzy
            .search(tasks, query, TASK_KEYS)
            .into_iter()
            .map(|hit| SearchResultItem {
                item: self.enrich(hit.item),
                ref_index: hit.ref_index,
                score: hit.score,
            })
            .collect::<Vec<_>>();
        tracing::debug!(query, count = hits.len(), "tasks matched");
        Ok(hits)
    }

    /// Replaces the published results.
    pub fn publish(&self, hits: Vec<SearchResultItem<EnrichedTask>>) {
        self.filtered.send_replace(hits);
    }

    /// Empties the published results.
    pub fn reset_search_tasks(&self) {
        self.filtered.send_if_modified(|list| {
            let changed = !list.is_empty();
            list.clear();
            changed
        });
    }

    #[must_use]
    pub fn filtered_tasks(&self) -> Vec<SearchResultItem<EnrichedTask>> {
        self.filtered.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<SearchResultItem<EnrichedTask>>> {
        self.filtered.subscribe()
    }

    fn enrich(&self, task: Task) -> EnrichedTask {
        let done = task.status == TaskStatus::Completed;
        let from = if done {
            Some(TaskFrom {
                name: COMPLETE_SMART_PROJECT.name.to_string(),
            })
        } else {
            self.projects
                .find_project(&task.project_id)
                .map(|project| TaskFrom { name: project.name })
        };
        EnrichedTask {
            id: task.id,
            title: task.title,
            desc: task.content,
            project_id: task.project_id,
            done,
            from,
        }
    }
}
