//! CLI command definitions and dispatch.

pub mod account;
pub mod config;
pub mod serve;
pub mod session;
pub mod store;
pub mod tenant;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use storefront_core::config::AppConfig;
use storefront_core::error::AppError;
use storefront_session::{Destination, Navigator, StorefrontClient};

use crate::output::{self, OutputFormat};

/// SellExplore storefront: seller session, store management, and edge server
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the edge server
    Serve(serve::ServeArgs),
    /// Sign in, sign out, register, and inspect the seller session
    Session(session::SessionArgs),
    /// Password reset
    Account(account::AccountArgs),
    /// Store profile, configuration, images, and FAQs
    Store(store::StoreArgs),
    /// Host-based tenant routing
    Tenant(tenant::TenantArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Session(args) => session::execute(args, &self.config, self.format).await,
            Commands::Account(args) => account::execute(args, &self.config).await,
            Commands::Store(args) => store::execute(args, &self.config, self.format).await,
            Commands::Tenant(args) => tenant::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: build a client on the configured token storage.
///
/// The client is rehydrated from storage; renewal is left to explicit
/// `session refresh` calls since every command is short-lived.
pub fn build_client(config_path: &str) -> Result<StorefrontClient, AppError> {
    let mut config = load_config(config_path)?;
    config.session.auto_refresh = false;
    StorefrontClient::from_config(&config, Arc::new(TerminalNavigator))
}

/// Reports navigation requests as the next page to open.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: Destination) {
        output::print_kv("Next", &destination.to_string());
    }
}

/// Helper: read a value from the terminal when it was not passed as an argument.
pub fn prompt_text(prompt: &str, value: Option<&String>) -> Result<String, AppError> {
    if let Some(value) = value {
        return Ok(value.clone());
    }
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

/// Helper: read a secret from the terminal without echo.
pub fn prompt_password(prompt: &str, confirm: bool) -> Result<String, AppError> {
    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Repeat password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
