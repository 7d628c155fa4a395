//! Client-side routes and the sign-in guard.
//!
//! Routes flagged as requiring auth can only be entered while the
//! [`TokenStore`] holds a token; otherwise navigation lands on
//! [`RouteName::Login`]. Unprotected routes are always reachable.

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::token::TokenStore;

/// Every route the client knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Task,
    Settings,
    SettingsTheme,
}

/// Static description of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    pub path: &'static str,
    /// Entering the route requires a stored token.
    pub requires_auth: bool,
}

/// The route table.
pub const ROUTES: &[Route] = &[
    Route {
        name: RouteName::Home,
        path: "/",
        requires_auth: false,
    },
    Route {
        name: RouteName::Login,
        path: "/login",
        requires_auth: false,
    },
    Route {
        name: RouteName::Task,
        path: "/task",
        requires_auth: true,
    },
    Route {
        name: RouteName::Settings,
        path: "/settings",
        requires_auth: true,
    },
    Route {
        name: RouteName::SettingsTheme,
        path: "/settings/theme",
        requires_auth: true,
    },
];

impl RouteName {
    /// This route's entry in [`ROUTES`].
    #[must_use]
    pub fn route(self) -> &'static Route {
        // The table lists every variant.
        ROUTES
            .iter()
            .find(|route| route.name == self)
            .unwrap_or(&ROUTES[0])
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        self.route().path
    }

    #[must_use]
    pub fn requires_auth(self) -> bool {
        self.route().requires_auth
    }

    /// Looks a route up by path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        ROUTES.iter().find(|r| r.path == path).map(|r| r.name)
    }
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// A navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub name: RouteName,
}

impl From<RouteName> for Location {
    fn from(name: RouteName) -> Self {
        Self { name }
    }
}

/// Anything that can be asked to navigate.
pub trait Navigator: Send + Sync {
    /// Navigates to `location` and returns the route actually entered.
    fn push(&self, location: Location) -> RouteName;
}

/// Router holding the current route, guarded by the token store.
#[derive(Debug)]
pub struct Router {
    token: TokenStore,
    current: watch::Sender<RouteName>,
    history: Mutex<Vec<RouteName>>,
}

impl Router {
    /// Creates a router on [`RouteName::Home`].
    #[must_use]
    pub fn new(token: TokenStore) -> Self {
        Self {
            token,
            current: watch::Sender::new(RouteName::Home),
            history: Mutex::new(vec![RouteName::Home]),
        }
    }

    #[must_use]
    pub fn current_route(&self) -> RouteName {
        *self.current.borrow()
    }

    /// Every route entered so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<RouteName> {
        self.history.lock().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RouteName> {
        self.current.subscribe()
    }

    fn guard(&self, to: RouteName) -> RouteName {
        if to.requires_auth() && !self.token.has_token() {
            tracing::debug!(to = %to, "no token, redirecting to login");
            RouteName::Login
        } else {
            to
        }
    }
}

impl Navigator for Router {
    fn push(&self, location: Location) -> RouteName {
        let entered = self.guard(location.name);
        self.history.lock().push(entered);
        self.current.send_replace(entered);
        tracing::debug!(route = %entered, "navigated");
        entered
    }
}
