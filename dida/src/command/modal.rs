//! Visibility of the command palette and its keyboard shortcut.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::watch;

/// Whether the host is macOS, where the palette also opens with `cmd+k`.
#[must_use]
pub const fn is_mac() -> bool {
    cfg!(target_os = "macos")
}

/// Open/closed flag of the command palette.
#[derive(Debug)]
pub struct CommandModal {
    shown: watch::Sender<bool>,
}

impl Default for CommandModal {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandModal {
    /// Creates a closed modal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shown: watch::Sender::new(false),
        }
    }

    pub fn open_command_modal(&self) {
        self.shown.send_if_modified(|shown| !std::mem::replace(shown, true));
    }

    pub fn close_command_modal(&self) {
        self.shown.send_if_modified(|shown| std::mem::replace(shown, false));
    }

    #[must_use]
    pub fn is_shown(&self) -> bool {
        *self.shown.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shown.subscribe()
    }

    /// Opens the modal on `ctrl+k`, or also `cmd+k` on macOS.
    ///
    /// Terminals only report `cmd` with keyboard enhancement enabled, so
    /// `ctrl+k` works everywhere. Returns `true` when the key was the
    /// shortcut.
    pub fn handle_shortcut(&self, key: &KeyEvent, mac: bool) -> bool {
        let modifier = if mac {
            KeyModifiers::SUPER | KeyModifiers::CONTROL
        } else {
            KeyModifiers::CONTROL
        };
        let hit = key.kind != KeyEventKind::Release
            && matches!(key.code, KeyCode::Char('k' | 'K'))
            && key.modifiers.intersects(modifier);
        if hit {
            self.open_command_modal();
        }
        hit
    }
}
