//! Remote backend configuration.

use serde::{Deserialize, Serialize};

/// Settings for reaching the storefront REST backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is joined onto.
    ///
    /// Overridable through `STOREFRONT_API__BASE_URL`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.sellexplore.shop".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    concat!("sellexplore-storefront/", env!("CARGO_PKG_VERSION")).to_string()
}
