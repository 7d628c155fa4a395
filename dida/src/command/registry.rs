//! Named actions shared by the palette and the rest of the client.

use std::sync::Arc;

use parking_lot::RwLock;

/// A named action.
#[derive(Clone)]
pub struct Command {
    name: String,
    execute: Arc<dyn Fn() + Send + Sync>,
}

impl Command {
    /// Creates a command running `execute` when invoked.
    pub fn new(name: impl Into<String>, execute: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            execute: Arc::new(execute),
        }
    }

    /// Display name, also the fuzzy search key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the action.
    pub fn execute(&self) {
        (self.execute)();
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of commands. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Arc<RwLock<Vec<Command>>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command. Duplicate names are kept.
    pub fn add_command(&self, command: Command) {
        tracing::debug!(name = command.name(), "command registered");
        self.commands.write().push(command);
    }

    /// Removes every command.
    pub fn reset_command(&self) {
        self.commands.write().clear();
    }

    /// Snapshot in registration order.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        self.commands.read().clone()
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    /// Runs the first command called `name`. Returns `false` if there is none.
    pub fn execute(&self, name: &str) -> bool {
        // Clone out so the action may touch the registry itself.
        let found = self
            .commands
            .read()
            .iter()
            .find(|c| c.name == name)
            .cloned();
        found.is_some_and(|command| {
            command.execute();
            true
        })
    }
}
