//! Tenant rewrite middleware.
//!
//! Must wrap the router rather than be layered onto it: the rewritten path
//! has to be in place before routing happens.

use std::str::FromStr;

use axum::extract::{Request, State};
use axum::http::header::HOST;
use axum::http::uri::{PathAndQuery, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use storefront_core::error::AppError;

use crate::error::EdgeError;
use crate::state::EdgeState;
use crate::tenant::resolve;

/// Resolves the tenant from the `Host` header, rewrites tenant requests
/// under the vendor prefix and attaches the
/// [`TenantContext`](storefront_core::types::TenantContext) as an extension.
pub async fn rewrite_tenant_path(
    State(state): State<EdgeState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request_host(&request);
    let resolution = resolve(
        &host,
        request.uri().path(),
        request.uri().query(),
        &state.config.tenant,
    );

    if let Some(target) = &resolution.rewritten {
        match rewritten_uri(request.uri(), target) {
            Ok(uri) => {
                debug!(
                    host = %resolution.context.host,
                    subdomain = %resolution.context.subdomain,
                    from = %request.uri().path(),
                    to = %uri.path(),
                    "Rewrote tenant request"
                );
                *request.uri_mut() = uri;
            }
            Err(e) => return e.into_response(),
        }
    }

    request.extensions_mut().insert(resolution.context);
    next.run(request).await
}

fn request_host(request: &Request) -> String {
    request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default()
}

fn rewritten_uri(original: &Uri, target: &str) -> Result<Uri, EdgeError> {
    let path_and_query = PathAndQuery::from_str(target)
        .map_err(|e| AppError::validation(format!("Invalid request path: {e}")))?;
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts)
        .map_err(|e| EdgeError(AppError::validation(format!("Invalid request path: {e}"))))
}
