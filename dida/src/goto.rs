//! Navigation shortcuts used by commands and the header.

use std::process::Command;
use std::sync::Arc;

use crate::router::{Navigator, RouteName};

/// Project home page.
pub const GITHUB_URL: &str = "https://github.com/cuixueshe/dida";

/// Named navigation helpers over a [`Navigator`].
#[derive(Clone)]
pub struct Goto {
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for Goto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Goto").finish_non_exhaustive()
    }
}

impl Goto {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    pub fn goto_home(&self) -> RouteName {
        self.navigator.push(RouteName::Home.into())
    }

    pub fn goto_settings(&self) -> RouteName {
        self.navigator.push(RouteName::Settings.into())
    }

    pub fn goto_login(&self) -> RouteName {
        self.navigator.push(RouteName::Login.into())
    }

    pub fn goto_task(&self) -> RouteName {
        self.navigator.push(RouteName::Task.into())
    }
}

/// Opens URLs outside the client.
pub trait UrlOpener: Send + Sync {
    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the launcher, if any.
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        let mut command = if cfg!(target_os = "macos") {
            let mut c = Command::new("open");
            c.arg(url);
            c
        } else if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", "", url]);
            c
        } else {
            let mut c = Command::new("xdg-open");
            c.arg(url);
            c
        };
        command.spawn().map(drop)
    }
}

/// Opens the project page through `opener`. Failures are logged.
pub fn open_github(opener: &dyn UrlOpener) {
    if let Err(e) = opener.open(GITHUB_URL) {
        tracing::warn!(error = %e, url = GITHUB_URL, "failed to open browser");
    }
}
