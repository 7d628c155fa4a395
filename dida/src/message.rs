//! User-facing notifications raised by the HTTP layer.
//!
//! The HTTP client never talks to the UI directly; it reports failures
//! through a [`Notifier`]. The terminal front end installs a
//! [`RedirectNotifier`] so an expired session lands on the login route.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::goto::Goto;
use crate::router::Navigator;

/// Receives notifications the user should see.
pub trait Notifier: Send + Sync {
    /// A request failed with a message from the backend.
    fn error(&self, message: &str);

    /// The session is no longer valid; the user must sign in again.
    fn redirect_to_sign_in(&self);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(message, "request failed");
    }

    fn redirect_to_sign_in(&self) {
        tracing::warn!("session expired, sign-in required");
    }
}

/// Notifier that keeps the last error for display and sends the router to
/// the login route when the session expires.
pub struct RedirectNotifier {
    goto: Goto,
    last_error: Mutex<Option<String>>,
}

impl RedirectNotifier {
    /// Creates a notifier that navigates through `navigator`.
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            goto: Goto::new(navigator),
            last_error: Mutex::new(None),
        }
    }

    /// Takes the most recent error message, leaving none behind.
    pub fn take_error(&self) -> Option<String> {
        self.last_error.lock().take()
    }
}

impl Notifier for RedirectNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(message, "request failed");
        *self.last_error.lock() = Some(message.to_string());
    }

    fn redirect_to_sign_in(&self) {
        tracing::info!("session expired, redirecting to sign-in");
        *self.last_error.lock() = Some("登录已过期，请重新登录".to_string());
        self.goto.goto_login();
    }
}
