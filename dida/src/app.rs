//! Application state and event handling.
//!
//! Key handling is synchronous; anything that needs the backend is handed
//! back to the event loop as an [`AppAction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::command::{CommandModal, EnrichedTask, SearchController, SearchState, is_mac};
use crate::router::RouteName;
use crate::store::{ProjectLookup, Task, TaskSource};

/// Work the event loop must perform after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Run the registered command with this name.
    ExecuteCommand(String),
    /// Select the task with this id in the task list.
    OpenTask(String),
    /// Mark the task with this id as completed.
    CompleteTask(String),
    /// Move the task with this id to the trash.
    RemoveTask(String),
    /// Reload the task list.
    Reload,
}

/// One row of the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEntry {
    Command(String),
    Task(EnrichedTask),
}

/// Main application state.
pub struct App<S, P> {
    search: SearchController<S, P>,
    modal: CommandModal,
    mac: bool,
    /// Palette input.
    pub input: String,
    /// Cursor position in input (character index).
    pub cursor_position: usize,
    /// Selected palette row.
    pub selected_entry: usize,
    /// Visible task list.
    pub tasks: Vec<Task>,
    /// Selected task row.
    pub selected_task: usize,
    /// Current route, for the status bar.
    pub route: RouteName,
    /// Last message worth showing the user.
    pub status_message: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<S, P> App<S, P>
where
    S: TaskSource + 'static,
    P: ProjectLookup + 'static,
{
    #[must_use]
    pub fn new(search: SearchController<S, P>) -> Self {
        Self {
            search,
            modal: CommandModal::new(),
            mac: is_mac(),
            input: String::new(),
            cursor_position: 0,
            selected_entry: 0,
            tasks: Vec::new(),
            selected_task: 0,
            route: RouteName::Home,
            status_message: None,
            should_quit: false,
        }
    }

    /// Overrides host detection for the palette shortcut.
    #[must_use]
    pub const fn with_mac_shortcut(mut self, mac: bool) -> Self {
        self.mac = mac;
        self
    }

    #[must_use]
    pub const fn search(&self) -> &SearchController<S, P> {
        &self.search
    }

    #[must_use]
    pub const fn modal(&self) -> &CommandModal {
        &self.modal
    }

    #[must_use]
    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    /// Replaces the task list, keeping the selection in range.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.selected_task = self.selected_task.min(self.tasks.len().saturating_sub(1));
    }

    /// Rows currently shown in the palette.
    #[must_use]
    pub fn palette_entries(&self) -> Vec<PaletteEntry> {
        let commands = self.search.command_searcher().filtered_commands();
        if commands.is_empty() {
            self.search
                .task_searcher()
                .filtered_tasks()
                .into_iter()
                .map(|hit| PaletteEntry::Task(hit.item))
                .collect()
        } else {
            commands
                .iter()
                .map(|c| PaletteEntry::Command(c.name().to_string()))
                .collect()
        }
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            self.should_quit = true;
            return None;
        }
        if self.modal.handle_shortcut(&key, self.mac) {
            self.clear_input();
            return None;
        }

        if self.modal.is_shown() {
            self.handle_palette_key(key)
        } else {
            self.handle_task_key(key)
        }
    }

    fn handle_palette_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Esc => self.close_palette(),
            KeyCode::Enter => return self.submit_entry(),
            KeyCode::Up => self.selected_entry = self.selected_entry.saturating_sub(1),
            KeyCode::Down => self.selected_entry += 1,
            KeyCode::Left => self.cursor_position = self.cursor_position.saturating_sub(1),
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count());
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let at = self.byte_index();
                    self.input.remove(at);
                    self.input_changed();
                }
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let at = self.byte_index();
                self.input.insert(at, c);
                self.cursor_position += 1;
                self.input_changed();
            }
            _ => {}
        }
        None
    }

    fn handle_task_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        let selected = self.tasks.get(self.selected_task).map(|t| t.id.clone());
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_task + 1 < self.tasks.len() {
                    self.selected_task += 1;
                }
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => selected.map(AppAction::CompleteTask),
            KeyCode::Char('d') => selected.map(AppAction::RemoveTask),
            KeyCode::Char('r') => Some(AppAction::Reload),
            _ => None,
        }
    }

    fn submit_entry(&mut self) -> Option<AppAction> {
        let entries = self.palette_entries();
        let index = self.selected_entry.min(entries.len().saturating_sub(1));
        let action = match entries.into_iter().nth(index)? {
            PaletteEntry::Command(name) => AppAction::ExecuteCommand(name),
            PaletteEntry::Task(task) => {
                if let Some(row) = self.tasks.iter().position(|t| t.id == task.id) {
                    self.selected_task = row;
                }
                AppAction::OpenTask(task.id)
            }
        };
        self.close_palette();
        Some(action)
    }

    fn close_palette(&mut self) {
        self.modal.close_command_modal();
        self.clear_input();
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.selected_entry = 0;
        self.search.reset_search();
    }

    fn input_changed(&mut self) {
        self.selected_entry = 0;
        self.search.set_search(self.input.clone());
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map_or(self.input.len(), |(i, _)| i)
    }
}
