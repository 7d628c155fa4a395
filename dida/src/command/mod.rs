//! The command palette: registry, modal, and the debounced search that
//! feeds it.
//!
//! Typing plain text searches tasks; a leading `>` searches the
//! [`CommandRegistry`] instead. Both result lists are watch channels so the
//! UI can redraw on change.

pub mod fuzzy;
pub mod modal;
pub mod registry;
pub mod search;
pub mod search_commands;
pub mod search_tasks;

pub use fuzzy::{FuzzySearch, SearchResultItem};
pub use modal::{CommandModal, is_mac};
pub use registry::{Command, CommandRegistry};
pub use search::{DEFAULT_DEBOUNCE, SearchController, SearchState, command_query};
pub use search_commands::CommandSearcher;
pub use search_tasks::{EnrichedTask, TaskFrom, TaskSearcher};
