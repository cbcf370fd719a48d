//! Route definitions for the edge application.

use axum::Router;
use axum::routing::get;
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers;
use crate::state::EdgeState;

/// Build the router for already-rewritten requests.
///
/// Storefront pages live under the configured vendor prefix; everything
/// else falls through to the main site.
pub fn build_router(state: EdgeState) -> Router {
    let static_dir = state.config.server.static_dir.trim_end_matches('/').to_string();
    let prefix = state.config.tenant.vendor_prefix.trim_end_matches('/').to_string();

    let storefront_routes = Router::new()
        .route(
            &format!("{prefix}/{{subdomain}}"),
            get(handlers::pages::storefront_index),
        )
        .route(
            &format!("{prefix}/{{subdomain}}/"),
            get(handlers::pages::storefront_index),
        )
        .route(
            &format!("{prefix}/{{subdomain}}/{{*rest}}"),
            get(handlers::pages::storefront_route),
        );

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest_service(
            "/_next/static",
            ServeDir::new(format!("{static_dir}/_next/static")),
        )
        .route_service(
            "/favicon.ico",
            ServeFile::new(format!("{static_dir}/favicon.ico")),
        )
        .merge(storefront_routes)
        .fallback(handlers::pages::main_page)
        .with_state(state)
}
