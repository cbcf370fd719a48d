//! Password reset flows. These never touch the session.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, warn};
use validator::ValidateEmail;

use storefront_core::types::FieldErrors;

use crate::http::{ApiError, HttpExecutor, RequestOptions};
use crate::session::errors::{joined_text, server_text};

const PASSWORD_RESET_PATH: &str = "/password-reset/";

const RESET_REQUESTED: &str = "If an account exists for that email, a reset link has been sent.";
const RESET_CONFIRMED: &str = "Your password has been reset.";
const RESET_FAILED: &str = "Password reset failed. Please try again.";

/// Client for the unauthenticated account endpoints.
#[derive(Debug, Clone)]
pub struct AccountClient {
    executor: Arc<HttpExecutor>,
}

impl AccountClient {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }

    /// Asks the backend to email a reset link. Returns the server's message.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, FieldErrors> {
        let email = email.trim();
        if !email.validate_email() {
            return Err(FieldErrors::field("email", "Enter a valid email address"));
        }

        let options = RequestOptions::post()
            .json(json!({ "email": email }))
            .error_message(RESET_FAILED);

        match self.executor.execute(PASSWORD_RESET_PATH, options).await {
            Ok(body) => {
                info!(email = %email, "Password reset requested");
                Ok(message_or(&body, RESET_REQUESTED))
            }
            Err(e) => {
                warn!(email = %email, error = %e, "Password reset request failed");
                Err(reset_errors(&e, &["email"]))
            }
        }
    }

    /// Sets a new password using the `uidb64`/`token` pair from a reset link.
    pub async fn confirm_password_reset(
        &self,
        uidb64: &str,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<String, FieldErrors> {
        if !is_path_segment(uidb64) || !is_path_segment(token) {
            return Err(FieldErrors::global("Invalid or expired reset link"));
        }
        if password.is_empty() {
            return Err(FieldErrors::field("password", "Password is required"));
        }
        if password != password_confirm {
            return Err(FieldErrors::field(
                "password_confirm",
                "Passwords do not match",
            ));
        }

        let path = format!("/reset-password/{uidb64}/{token}/");
        let options = RequestOptions::post()
            .json(json!({
                "password": password,
                "password_confirm": password_confirm,
            }))
            .error_message(RESET_FAILED);

        match self.executor.execute(&path, options).await {
            Ok(body) => {
                info!("Password reset confirmed");
                Ok(message_or(&body, RESET_CONFIRMED))
            }
            Err(e) => {
                warn!(error = %e, "Password reset confirmation failed");
                Err(reset_errors(&e, &["password", "password_confirm"]))
            }
        }
    }
}

fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '='))
}

fn message_or(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn reset_errors(err: &ApiError, fields: &[&str]) -> FieldErrors {
    let ApiError::Status { message, body, .. } = err else {
        return FieldErrors::global(err.to_string());
    };

    let mut errors = FieldErrors::new();
    if let Some(body) = body {
        for field in fields {
            if let Some(text) = body.get(*field).and_then(joined_text) {
                errors.insert(*field, text);
            }
        }
    }
    if errors.is_empty() {
        let text = body
            .as_ref()
            .and_then(server_text)
            .unwrap_or_else(|| message.clone());
        errors.set_global(text);
    }
    errors
}
