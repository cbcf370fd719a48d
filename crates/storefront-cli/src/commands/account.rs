//! Password reset CLI commands.

use clap::{Args, Subcommand};

use storefront_core::error::AppError;

use crate::output;

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account subcommand
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Email a password reset link
    ResetRequest {
        /// Account email
        email: String,
    },
    /// Set a new password from a reset link
    ResetConfirm {
        /// Encoded user id from the link
        uid: String,
        /// Reset token from the link
        token: String,
    },
}

/// Execute account commands
pub async fn execute(args: &AccountArgs, config_path: &str) -> Result<(), AppError> {
    let client = super::build_client(config_path)?;
    let account = &client.account;

    let result = match &args.command {
        AccountCommand::ResetRequest { email } => account.request_password_reset(email).await,
        AccountCommand::ResetConfirm { uid, token } => {
            let password = super::prompt_password("New password", false)?;
            let confirm = super::prompt_password("Repeat password", false)?;
            account
                .confirm_password_reset(uid, token, &password, &confirm)
                .await
        }
    };

    match result {
        Ok(message) => {
            output::print_success(&message);
            Ok(())
        }
        Err(errors) => {
            output::print_field_errors(&errors);
            Err(AppError::validation("Password reset failed"))
        }
    }
}
