//! Client session configuration.

use serde::{Deserialize, Serialize};

/// Client session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval between proactive access-token renewals, in milliseconds.
    ///
    /// Access tokens live 15 minutes on the backend; renewing at 14 leaves
    /// a minute of slack.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
    /// Whether renewal is scheduled automatically while authenticated.
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
            auto_refresh: true,
        }
    }
}

fn default_refresh_interval() -> u64 {
    14 * 60 * 1000
}

fn default_true() -> bool {
    true
}
