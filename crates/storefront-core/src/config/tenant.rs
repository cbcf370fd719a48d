//! Multi-tenant host routing configuration.

use serde::{Deserialize, Serialize};

/// Host-based tenant routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Canonical root domain. Requests for it (or `www.` + it) are not rewritten.
    #[serde(default = "default_base_domain")]
    pub base_domain: String,
    /// Path prefix tenant requests are rewritten under.
    #[serde(default = "default_vendor_prefix")]
    pub vendor_prefix: String,
    /// Path prefixes that are never rewritten.
    #[serde(default = "default_exempt_paths")]
    pub exempt_paths: Vec<String>,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            base_domain: default_base_domain(),
            vendor_prefix: default_vendor_prefix(),
            exempt_paths: default_exempt_paths(),
        }
    }
}

fn default_base_domain() -> String {
    "sellexplore.shop".to_string()
}

fn default_vendor_prefix() -> String {
    "/vendor".to_string()
}

fn default_exempt_paths() -> Vec<String> {
    vec![
        "/_next/static".to_string(),
        "/_next/image".to_string(),
        "/favicon.ico".to_string(),
    ]
}
