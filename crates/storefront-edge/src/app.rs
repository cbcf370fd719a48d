//! Application builder: wires router, tenant rewrite, and middleware into an
//! Axum app, and runs it.

use std::time::Duration;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use storefront_core::config::AppConfig;
use storefront_core::error::AppError;
use storefront_core::result::AppResult;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::middleware::tenant::rewrite_tenant_path;
use crate::router::build_router;
use crate::state::EdgeState;

/// Builds the complete edge application.
///
/// The routed app is mounted as the fallback of an empty router so the
/// tenant rewrite runs before any route is matched.
pub fn build_app(state: EdgeState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let routed = build_router(state.clone());

    Router::new()
        .fallback_service(routed)
        .layer(from_fn_with_state(state, rewrite_tenant_path))
        .layer(from_fn(request_logging))
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the edge server until a shutdown signal arrives.
///
/// In-flight requests get `server.shutdown_grace_seconds` to finish.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = EdgeState::new(config);
    let app = build_app(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(
        addr = %addr,
        base_domain = %state.config.tenant.base_domain,
        static_dir = %state.config.server.static_dir,
        "Storefront edge listening"
    );

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, draining connections");
        signal.cancel();
    });

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            shutdown.cancelled().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out");
        }
    }

    info!("Storefront edge shut down");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
