//! Start the edge server.

use clap::Args;

use storefront_core::error::AppError;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the bind port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the static asset directory
    #[arg(long)]
    pub static_dir: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.static_dir {
        config.server.static_dir = dir.clone();
    }

    output::print_success(&format!(
        "Starting edge server on {}:{} for {}",
        config.server.host, config.server.port, config.tenant.base_domain
    ));

    storefront_edge::run_server(config).await
}
