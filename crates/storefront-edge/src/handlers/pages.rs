//! Page route resolution for the main site and tenant storefronts.

use axum::extract::{Extension, Path};
use axum::http::Uri;
use axum::Json;
use serde::{Deserialize, Serialize};

use storefront_core::error::AppError;
use storefront_core::types::TenantContext;

use crate::error::EdgeError;

/// Which page tree serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    /// Marketing site and seller dashboard on the root domain.
    Main,
    /// A seller's storefront.
    Storefront,
}

/// Description of the page a request resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub site: Site,
    /// Storefront subdomain, for storefront pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    /// Page path inside the site.
    pub route: String,
    /// Cleaned request host.
    pub host: String,
}

/// GET /vendor/{subdomain} and /vendor/{subdomain}/
pub async fn storefront_index(
    Path(subdomain): Path<String>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<PageResponse>, EdgeError> {
    storefront_page(subdomain, String::new(), tenant)
}

/// GET /vendor/{subdomain}/{*rest}
pub async fn storefront_route(
    Path((subdomain, rest)): Path<(String, String)>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<PageResponse>, EdgeError> {
    storefront_page(subdomain, rest, tenant)
}

/// Any path not claimed by another route belongs to the main site.
pub async fn main_page(uri: Uri, Extension(tenant): Extension<TenantContext>) -> Json<PageResponse> {
    Json(PageResponse {
        site: Site::Main,
        store: None,
        route: uri.path().to_string(),
        host: tenant.host,
    })
}

fn storefront_page(
    subdomain: String,
    rest: String,
    tenant: TenantContext,
) -> Result<Json<PageResponse>, EdgeError> {
    if !is_valid_subdomain(&subdomain) {
        return Err(AppError::not_found(format!("Unknown store: {subdomain}")).into());
    }

    Ok(Json(PageResponse {
        site: Site::Storefront,
        store: Some(subdomain),
        route: format!("/{}", rest.trim_start_matches('/')),
        host: tenant.host,
    }))
}

/// A single DNS label: lowercase letters, digits and inner hyphens.
fn is_valid_subdomain(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 63
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomain_labels() {
        assert!(is_valid_subdomain("shop"));
        assert!(is_valid_subdomain("corner-shop-2"));
        assert!(!is_valid_subdomain(""));
        assert!(!is_valid_subdomain("-shop"));
        assert!(!is_valid_subdomain("Shop"));
        assert!(!is_valid_subdomain("sh_op"));
    }
}
