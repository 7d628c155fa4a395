//! Bearer token storage.
//!
//! The [`TokenStore`] is a cheaply cloneable handle shared by the HTTP
//! client (which attaches the token) and the router (which gates protected
//! routes on its presence). A store created with
//! [`TokenStore::persistent`] mirrors the token into a file so a session
//! survives restarts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug, Default)]
struct TokenInner {
    token: RwLock<Option<String>>,
    path: Option<PathBuf>,
}

/// Shared handle to the current bearer token.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<TokenInner>,
}

/// Default location of the persisted token (`~/.config/dida/token`).
#[must_use]
pub fn default_token_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dida").join("token"))
}

impl TokenStore {
    /// Creates an in-memory store with no token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store backed by `path`, loading any token already saved there.
    ///
    /// An unreadable or missing file simply starts the store empty.
    #[must_use]
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read token file");
                }
                None
            }
        };
        Self {
            inner: Arc::new(TokenInner {
                token: RwLock::new(token),
                path: Some(path),
            }),
        }
    }

    /// Returns the current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    /// Returns `true` if a token is stored.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Stores a token, replacing any previous one.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if let Some(path) = &self.inner.path {
            write_token_file(path, &token);
        }
        *self.inner.token.write() = Some(token);
    }

    /// Forgets the token (sign-out).
    pub fn clean_token(&self) {
        *self.inner.token.write() = None;
        if let Some(path) = &self.inner.path
            && let Err(e) = std::fs::remove_file(path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove token file");
        }
    }
}

fn write_token_file(path: &Path, token: &str) {
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!(path = %parent.display(), error = %e, "failed to create token directory");
        return;
    }
    if let Err(e) = std::fs::write(path, token) {
        tracing::warn!(path = %path.display(), error = %e, "failed to persist token");
    }
}
