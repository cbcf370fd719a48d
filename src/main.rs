//! SellExplore storefront edge server.
//!
//! Loads configuration, initializes logging, and serves the tenant-routing
//! edge application until a shutdown signal arrives.

use tracing_subscriber::{EnvFilter, fmt};

use storefront_core::config::AppConfig;
use storefront_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        "Starting SellExplore storefront"
    );

    if let Err(e) = storefront_edge::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
///
/// `STOREFRONT_CONFIG` selects the base file; `STOREFRONT_ENV` selects the
/// overlay.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("STOREFRONT_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
