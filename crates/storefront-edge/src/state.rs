//! State shared across edge handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use storefront_core::config::AppConfig;

/// Cheap-to-clone application state.
#[derive(Debug, Clone)]
pub struct EdgeState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl EdgeState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
