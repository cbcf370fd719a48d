//! Seller session CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use storefront_core::error::AppError;
use storefront_session::RegistrationForm;

use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Sign in; the password is prompted for
    Login {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out and forget stored tokens
    Logout,
    /// Show the current session
    Status,
    /// Renew the access token now
    Refresh,
    /// Create a seller account and store
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        store_name: Option<String>,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        niche: String,
    },
}

#[derive(Debug, Serialize)]
struct SessionStatus {
    phase: String,
    authenticated: bool,
    authenticated_at: Option<String>,
    last_refreshed_at: Option<String>,
    access_token: Option<String>,
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::build_client(config_path)?;
    let session = &client.session;

    match &args.command {
        SessionCommand::Login { email } => {
            let email = super::prompt_text("Email", email.as_ref())?;
            let password = super::prompt_password("Password", false)?;

            if !session.login(&email, &password).await {
                output::print_field_errors(&session.errors());
                return Err(AppError::authentication("Login failed"));
            }
            output::print_success(&format!("Signed in as {}", email.trim()));
        }
        SessionCommand::Logout => {
            if session.is_authenticated() {
                session.logout();
                output::print_success("Signed out");
            } else {
                output::print_warning("No active session");
            }
        }
        SessionCommand::Status => {
            let snapshot = session.snapshot();
            let status = SessionStatus {
                phase: snapshot.phase.to_string(),
                authenticated: snapshot.is_authenticated,
                authenticated_at: snapshot.authenticated_at.map(|t| t.to_rfc3339()),
                last_refreshed_at: snapshot.last_refreshed_at.map(|t| t.to_rfc3339()),
                access_token: session.access_token().map(|t| mask_token(&t)),
            };

            match format {
                OutputFormat::Json => output::print_item(&status, format),
                OutputFormat::Table => {
                    println!("Session:");
                    output::print_kv("Phase", &status.phase);
                    output::print_kv("Authenticated", &status.authenticated.to_string());
                    output::print_kv(
                        "Since",
                        status.authenticated_at.as_deref().unwrap_or("-"),
                    );
                    output::print_kv(
                        "Last refreshed",
                        status.last_refreshed_at.as_deref().unwrap_or("-"),
                    );
                    output::print_kv(
                        "Access token",
                        status.access_token.as_deref().unwrap_or("-"),
                    );
                }
            }
        }
        SessionCommand::Refresh => {
            if !session.is_authenticated() {
                return Err(AppError::authentication("Not signed in"));
            }
            if !session.refresh().await {
                return Err(AppError::authentication(
                    "Session expired, sign in again",
                ));
            }
            output::print_success("Access token renewed");
        }
        SessionCommand::Register {
            email,
            full_name,
            store_name,
            location,
            niche,
        } => {
            let form = RegistrationForm {
                email: super::prompt_text("Email", email.as_ref())?,
                full_name: super::prompt_text("Full name", full_name.as_ref())?,
                store_name: super::prompt_text("Store name", store_name.as_ref())?,
                password: super::prompt_password("Password", true)?,
                location: location.clone(),
                niche: niche.clone(),
            };

            if !session.register(form).await {
                output::print_field_errors(&session.errors());
                return Err(AppError::validation("Registration failed"));
            }
            output::print_success("Account created, sign in to continue");
        }
    }

    client.shutdown();
    Ok(())
}

/// Keep only enough of a token to tell two apart.
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(8).collect();
    if visible.len() < token.len() {
        format!("{visible}…")
    } else {
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abc"), "abc");
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9"), "eyJhbGci…");
    }
}
