//! Hook for moving the user after a session transition.

use std::fmt;

/// Where the caller should send the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// The authenticated seller dashboard.
    Dashboard,
    /// The sign-in page.
    Login,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => write!(f, "/dashboard"),
            Self::Login => write!(f, "/login"),
        }
    }
}

/// Receives navigation requests from the session manager.
pub trait Navigator: Send + Sync + fmt::Debug + 'static {
    /// Move to `destination`.
    fn navigate(&self, destination: Destination);
}

/// Navigator that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _destination: Destination) {}
}
