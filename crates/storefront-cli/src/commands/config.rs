//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use storefront_core::config::StorageBackend;
use storefront_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv(
                    "Server",
                    &format!("{}:{}", config.server.host, config.server.port),
                );
                output::print_kv("API", &config.api.base_url);
                output::print_kv("Base domain", &config.tenant.base_domain);
                let storage = match config.storage.backend {
                    StorageBackend::File => format!("file ({})", config.storage.path),
                    StorageBackend::Memory => "memory".to_string(),
                };
                output::print_kv("Token storage", &storage);
                if !config.session.auto_refresh {
                    output::print_warning("Automatic token renewal is disabled");
                }
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
