//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a default so an empty file is valid.

pub mod api;
pub mod app;
pub mod logging;
pub mod session;
pub mod storage;
pub mod tenant;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::api::ApiConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::storage::{StorageBackend, StorageConfig};
pub use self::tenant::TenantConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`STOREFRONT_API__BASE_URL`).
pub const ENV_PREFIX: &str = "STOREFRONT";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay) and
/// `STOREFRONT_*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Edge HTTP server settings.
    pub server: ServerConfig,
    /// Remote backend settings.
    pub api: ApiConfig,
    /// Client session settings.
    pub session: SessionConfig,
    /// Multi-tenant host routing settings.
    pub tenant: TenantConfig,
    /// Client-side token persistence settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the given file, an optional `config/{env}` overlay selected by
    /// `STOREFRONT_ENV`, and environment variables prefixed with
    /// `STOREFRONT_`. Missing files are not an error.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("STOREFRONT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;

        debug!(path, env = %env, api = %config.api.base_url, "Configuration loaded");
        Ok(config)
    }

    /// Rejects values that would spin the renewal timer or time out every
    /// request immediately.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.session.refresh_interval_ms == 0 {
            return Err(AppError::configuration(
                "session.refresh_interval_ms must be greater than zero",
            ));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(AppError::configuration(
                "api.request_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}
