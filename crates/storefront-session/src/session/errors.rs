//! Mapping of backend failures to user-facing session messages.

use serde_json::Value;

use storefront_core::types::FieldErrors;

use super::forms::RegistrationForm;
use crate::http::ApiError;
use crate::http::executor::error_message_from_body;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const INVALID_SERVER_RESPONSE: &str = "Invalid response from server";

/// Global message for a failed sign-in.
pub fn login_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Transport(_) | ApiError::Timeout(_) => err.to_string(),
        ApiError::Status {
            status: 400 | 401, ..
        } => INVALID_CREDENTIALS.to_string(),
        ApiError::Status { message, body, .. } => {
            let text = body
                .as_ref()
                .and_then(server_text)
                .unwrap_or_else(|| message.clone());
            if mentions_credentials(&text) {
                INVALID_CREDENTIALS.to_string()
            } else if text.trim().is_empty() {
                LOGIN_FAILED.to_string()
            } else {
                text
            }
        }
        ApiError::InvalidResponse => INVALID_SERVER_RESPONSE.to_string(),
        ApiError::InvalidRequest(_) => LOGIN_FAILED.to_string(),
    }
}

/// Field-keyed messages for a failed sign-up.
///
/// A body keyed by form field wins; otherwise the server's text is routed
/// to a field by keyword, falling back to the global slot.
pub fn registration_errors(err: &ApiError) -> FieldErrors {
    match err {
        ApiError::Transport(_) | ApiError::Timeout(_) => FieldErrors::global(err.to_string()),
        ApiError::Status { message, body, .. } => {
            if let Some(body) = body {
                let structured = structured_field_errors(body);
                if !structured.is_empty() {
                    return structured;
                }
            }
            let text = body
                .as_ref()
                .and_then(server_text)
                .unwrap_or_else(|| message.clone());
            classify_registration_text(&text)
        }
        ApiError::InvalidResponse => FieldErrors::global(INVALID_SERVER_RESPONSE),
        ApiError::InvalidRequest(_) => FieldErrors::global(REGISTRATION_FAILED),
    }
}

/// `error`, then `detail`/`message`, then DRF-style `non_field_errors`.
pub(crate) fn server_text(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .or_else(|| error_message_from_body(body))
        .or_else(|| body.get("non_field_errors").and_then(joined_text))
}

fn mentions_credentials(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("invalid") || lower.contains("credential")
}

fn structured_field_errors(body: &Value) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in RegistrationForm::FIELDS {
        if let Some(text) = body.get(field).and_then(joined_text) {
            errors.insert(field, text);
        }
    }
    errors
}

/// A string, or an array of strings joined with spaces.
pub(crate) fn joined_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn classify_registration_text(text: &str) -> FieldErrors {
    if text.trim().is_empty() {
        return FieldErrors::global(REGISTRATION_FAILED);
    }

    let lower = text.to_lowercase();
    if lower.contains("email") {
        FieldErrors::field("email", text)
    } else if lower.contains("store name") || lower.contains("store_name") {
        FieldErrors::field("store_name", text)
    } else {
        FieldErrors::global(text)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn status(status: u16, body: Value) -> ApiError {
        ApiError::Status {
            status,
            message: error_message_from_body(&body).unwrap_or_else(|| "Request failed".into()),
            body: Some(body),
        }
    }

    #[test]
    fn test_login_bad_request_is_invalid_credentials() {
        let err = status(401, json!({"error": "No active account"}));
        assert_eq!(login_failure_message(&err), INVALID_CREDENTIALS);

        let err = status(403, json!({"error": "Invalid credentials supplied"}));
        assert_eq!(login_failure_message(&err), INVALID_CREDENTIALS);
    }

    #[test]
    fn test_login_other_failures() {
        let err = status(500, json!({"error": "Database unavailable"}));
        assert_eq!(login_failure_message(&err), "Database unavailable");

        let err = ApiError::Status {
            status: 502,
            message: String::new(),
            body: None,
        };
        assert_eq!(login_failure_message(&err), LOGIN_FAILED);

        let err = ApiError::Timeout(Duration::from_millis(50));
        assert_eq!(login_failure_message(&err), "Request timed out after 50 ms");
    }

    #[test]
    fn test_registration_structured_body_wins() {
        let err = status(
            400,
            json!({
                "email": ["user with this email already exists."],
                "store_name": "Taken",
                "error": "store name problem"
            }),
        );
        let errors = registration_errors(&err);
        assert_eq!(errors.get("email"), Some("user with this email already exists."));
        assert_eq!(errors.get("store_name"), Some("Taken"));
        assert_eq!(errors.global_message(), None);
    }

    #[test]
    fn test_registration_text_heuristic() {
        let errors = registration_errors(&status(400, json!({"error": "Email already exists"})));
        assert_eq!(errors.get("email"), Some("Email already exists"));

        let errors = registration_errors(&status(400, json!({"error": "Store Name is taken"})));
        assert_eq!(errors.get("store_name"), Some("Store Name is taken"));

        let errors = registration_errors(&status(400, json!({"detail": "Slow down"})));
        assert_eq!(errors.global_message(), Some("Slow down"));

        let errors =
            registration_errors(&status(400, json!({"non_field_errors": ["Bad", "input"]})));
        assert_eq!(errors.global_message(), Some("Bad input"));
    }
}
