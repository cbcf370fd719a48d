//! Tenant routing CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use storefront_core::error::AppError;
use storefront_edge::resolve;

use crate::output::{self, OutputFormat};

/// Arguments for tenant commands
#[derive(Debug, Args)]
pub struct TenantArgs {
    /// Tenant subcommand
    #[command(subcommand)]
    pub command: TenantCommand,
}

/// Tenant subcommands
#[derive(Debug, Subcommand)]
pub enum TenantCommand {
    /// Show how the edge server would route a request
    Resolve {
        /// Request host, optionally with a port
        host: String,
        /// Request path, optionally with a query string
        #[arg(default_value = "/")]
        path: String,
    },
}

/// Resolution display row
#[derive(Debug, Serialize, Tabled)]
struct ResolutionRow {
    /// Cleaned host
    host: String,
    /// Tenant subdomain
    subdomain: String,
    /// Main domain
    main_domain: bool,
    /// Routed path
    routed_to: String,
}

/// Execute tenant commands
pub async fn execute(
    args: &TenantArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        TenantCommand::Resolve { host, path } => {
            let (path_only, query) = match path.split_once('?') {
                Some((p, q)) => (p, Some(q)),
                None => (path.as_str(), None),
            };
            let resolution = resolve(host, path_only, query, &config.tenant);

            let row = ResolutionRow {
                host: resolution.context.host.clone(),
                subdomain: resolution.context.subdomain.clone(),
                main_domain: resolution.context.is_main_domain,
                routed_to: resolution.rewritten.unwrap_or_else(|| path.clone()),
            };
            output::print_list(&[row], format);
        }
    }

    Ok(())
}
