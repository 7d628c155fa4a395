//! Fuzzy search over the command registry.

use tokio::sync::watch;

use super::fuzzy::{FuzzySearch, Key};
use super::registry::{Command, CommandRegistry};

const NAME: &[Key<Command>] = &[Command::name];

/// Filters the registry and publishes the visible commands.
#[derive(Debug)]
pub struct CommandSearcher {
    registry: CommandRegistry,
    fuzzy: FuzzySearch,
    filtered: watch::Sender<Vec<Command>>,
}

impl CommandSearcher {
    /// Creates a searcher over `registry` with an empty result list.
    #[must_use]
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            fuzzy: FuzzySearch::new(),
            filtered: watch::Sender::new(Vec::new()),
        }
    }

    /// Publishes the commands matching `query`.
    ///
    /// An empty query lists every command in registration order, including
    /// ones with an empty name.
    pub fn search_commands(&self, query: &str) {
        let commands = self.registry.commands();
        let visible = if query.is_empty() {
            commands
        } else {
            self.fuzzy
                .search(commands, query, NAME)
                .into_iter()
                .map(|hit| hit.item)
                .collect()
        };
        tracing::debug!(query, count = visible.len(), "commands filtered");
        self.filtered.send_replace(visible);
    }

    /// Empties the result list.
    pub fn reset_search_commands(&self) {
        self.filtered.send_if_modified(|list| {
            let changed = !list.is_empty();
            list.clear();
            changed
        });
    }

    /// Current result list.
    #[must_use]
    pub fn filtered_commands(&self) -> Vec<Command> {
        self.filtered.borrow().clone()
    }

    /// Observes the result list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Command>> {
        self.filtered.subscribe()
    }

    /// The registry being searched.
    #[must_use]
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}
