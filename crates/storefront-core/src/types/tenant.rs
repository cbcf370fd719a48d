//! Tenant context resolved from an inbound request host.

use serde::{Deserialize, Serialize};

/// Per-request tenant resolution.
///
/// Has no persisted identity; recomputed for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Cleaned host: port and leading `www.` stripped, lowercased.
    pub host: String,
    /// Tenant subdomain, empty on the canonical root domain.
    pub subdomain: String,
    /// True iff `subdomain` is empty.
    pub is_main_domain: bool,
}

impl TenantContext {
    /// Context for the canonical root domain.
    pub fn main(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            subdomain: String::new(),
            is_main_domain: true,
        }
    }

    /// Context for a tenant subdomain. An empty subdomain yields the main context.
    pub fn tenant(host: impl Into<String>, subdomain: impl Into<String>) -> Self {
        let subdomain = subdomain.into();
        Self {
            host: host.into(),
            is_main_domain: subdomain.is_empty(),
            subdomain,
        }
    }

    /// The tenant subdomain, or `None` on the main domain.
    pub fn tenant_slug(&self) -> Option<&str> {
        if self.is_main_domain {
            None
        } else {
            Some(&self.subdomain)
        }
    }
}
