//! Which project the task list is currently showing.

use parking_lot::RwLock;

use super::projects::{ListProject, SmartProject};

/// The current task list source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A user-created project; new tasks can be added to it.
    List(ListProject),
    /// A synthetic grouping; read-only.
    Smart(SmartProject),
}

/// Holds the current [`Selector`].
#[derive(Debug, Default)]
pub struct TasksSelector {
    current: RwLock<Option<Selector>>,
}

impl TasksSelector {
    /// Creates a selector with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current selection.
    pub fn set_current_selector(&self, selector: Option<Selector>) {
        *self.current.write() = selector;
    }

    /// The current selection, if any.
    pub fn current_selector(&self) -> Option<Selector> {
        self.current.read().clone()
    }

    /// The id of the selected list project; `None` for smart projects or
    /// when nothing is selected.
    pub fn current_list_project_id(&self) -> Option<String> {
        match &*self.current.read() {
            Some(Selector::List(project)) => Some(project.id.clone()),
            Some(Selector::Smart(_)) | None => None,
        }
    }
}
