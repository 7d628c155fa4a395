//! Debounced search over tasks and commands.
//!
//! [`SearchController`] owns the query and two UI flags. Editing the query
//! raises `loading` at once and (re)schedules a single commit after the
//! debounce interval; the commit routes the query to the command searcher
//! when it starts with `>` and to the task searcher otherwise.
//!
//! Each scheduled commit is stamped with a generation number. Only the
//! latest generation may publish results or lower `loading`, so a slow
//! task fetch overtaken by a newer edit or a reset is dropped.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::search_commands::CommandSearcher;
use super::search_tasks::TaskSearcher;
use crate::store::{ProjectLookup, TaskSource};

/// Delay between the last edit and the committed search.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Prefix that switches the palette from tasks to commands.
pub const COMMAND_PREFIX: char = '>';

/// Observable state of the search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Raw query as typed.
    pub query: String,
    /// True between an edit and its committed search.
    pub loading: bool,
    /// True once a non-empty query has been committed.
    pub searching: bool,
    /// Message of the last failed task fetch, cleared by the next success.
    pub last_error: Option<String>,
}

/// Returns the command part of `query` if it is a command query.
#[must_use]
pub fn command_query(query: &str) -> Option<&str> {
    query
        .trim()
        .strip_prefix(COMMAND_PREFIX)
        .map(str::trim)
}

#[derive(Default)]
struct Pending {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct Inner<S, P> {
    tasks: TaskSearcher<S, P>,
    commands: CommandSearcher,
    state: watch::Sender<SearchState>,
    pending: Mutex<Pending>,
    /// Latest generation whose commit has run or been cancelled by a reset.
    settled: watch::Sender<u64>,
    debounce: Duration,
}

/// The search box: query, debounce timer and result routing.
///
/// Cloning yields another handle to the same controller.
pub struct SearchController<S, P> {
    inner: Arc<Inner<S, P>>,
}

impl<S, P> Clone for SearchController<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, P> SearchController<S, P>
where
    S: TaskSource + 'static,
    P: ProjectLookup + 'static,
{
    /// Creates a controller with [`DEFAULT_DEBOUNCE`].
    pub fn new(tasks: TaskSearcher<S, P>, commands: CommandSearcher) -> Self {
        Self::with_debounce(tasks, commands, DEFAULT_DEBOUNCE)
    }

    /// Creates a controller with a custom debounce interval.
    pub fn with_debounce(
        tasks: TaskSearcher<S, P>,
        commands: CommandSearcher,
        debounce: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                tasks,
                commands,
                state: watch::Sender::new(SearchState::default()),
                pending: Mutex::new(Pending::default()),
                settled: watch::Sender::new(0),
                debounce,
            }),
        }
    }

    /// Replaces the query.
    ///
    /// An empty query resets the search. Anything else sets `loading`
    /// immediately and replaces the pending commit with a new one.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn set_search(&self, query: impl Into<String>) {
        let query = query.into();
        if query.is_empty() {
            self.reset_search();
            return;
        }

        self.inner.state.send_modify(|state| {
            state.query.clone_from(&query);
            state.loading = true;
        });

        let mut pending = self.inner.pending.lock();
        pending.generation += 1;
        let generation = pending.generation;
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.commit(generation, &query).await;
            inner.mark_settled(generation);
        });
        if let Some(previous) = pending.handle.replace(handle) {
            previous.abort();
        }
    }

    /// Clears the query, both result lists and both flags.
    pub fn reset_search(&self) {
        {
            let mut pending = self.inner.pending.lock();
            pending.generation += 1;
            if let Some(previous) = pending.handle.take() {
                previous.abort();
            }
            self.inner.tasks.reset_search_tasks();
            self.inner.commands.reset_search_commands();
            self.inner.mark_settled(pending.generation);
        }
        self.inner.state.send_if_modified(|state| {
            let cleared = SearchState::default();
            let changed = *state != cleared;
            *state = cleared;
            changed
        });
    }

    /// Waits until the latest scheduled commit, if any, has finished.
    ///
    /// Dropping the returned future leaves the pending commit untouched.
    pub async fn settled(&self) {
        let target = self.inner.pending.lock().generation;
        let mut settled = self.inner.settled.subscribe();
        // The sender lives in `inner`, so this only fails if it is gone.
        let _ = settled.wait_for(|done| *done >= target).await;
    }

    #[must_use]
    pub fn search(&self) -> String {
        self.inner.state.borrow().query.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    #[must_use]
    pub fn searching(&self) -> bool {
        self.inner.state.borrow().searching
    }

    /// Snapshot of the whole search state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Observes the search state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn task_searcher(&self) -> &TaskSearcher<S, P> {
        &self.inner.tasks
    }

    #[must_use]
    pub fn command_searcher(&self) -> &CommandSearcher {
        &self.inner.commands
    }
}

impl<S, P> Inner<S, P> {
    fn mark_settled(&self, generation: u64) {
        self.settled.send_if_modified(|done| {
            let advanced = generation > *done;
            if advanced {
                *done = generation;
            }
            advanced
        });
    }
}

impl<S: TaskSource, P: ProjectLookup> Inner<S, P> {
    async fn commit(&self, generation: u64, query: &str) {
        let command = command_query(query);
        let matched = match command {
            Some(_) => Ok(Vec::new()),
            None => self.tasks.find_matches(query).await,
        };

        // Generation checks and publishing happen under the same lock as
        // the bumps in `set_search` and `reset_search`.
        let pending = self.pending.lock();
        if pending.generation != generation {
            tracing::debug!(query, generation, "stale search dropped");
            return;
        }

        let last_error = match (command, matched) {
            (Some(command), _) => {
                self.tasks.reset_search_tasks();
                self.commands.search_commands(command);
                None
            }
            (None, Ok(hits)) => {
                self.commands.reset_search_commands();
                self.tasks.publish(hits);
                None
            }
            (None, Err(err)) => {
                tracing::warn!(query, error = %err, "task search failed");
                self.commands.reset_search_commands();
                self.tasks.reset_search_tasks();
                Some(err.to_string())
            }
        };

        self.state.send_modify(|state| {
            state.loading = false;
            state.searching = true;
            state.last_error = last_error;
        });
        drop(pending);
    }
}
