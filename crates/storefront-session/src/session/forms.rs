//! Credential forms submitted by the session manager.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use storefront_core::types::FieldErrors;

/// Seller sign-up form.
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Store name is required"))]
    pub store_name: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub location: String,
    pub niche: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
}

impl RegistrationForm {
    /// Field names the backend may report errors against.
    pub const FIELDS: [&'static str; 6] = [
        "email",
        "store_name",
        "password",
        "location",
        "niche",
        "full_name",
    ];

    /// Copy with every string field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            store_name: self.store_name.trim().to_string(),
            password: self.password.trim().to_string(),
            location: self.location.trim().to_string(),
            niche: self.niche.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
        }
    }

    /// Local validation, as field-keyed messages.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|e| field_errors_from(&e))
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("email", &self.email)
            .field("store_name", &self.store_name)
            .field("password", &"<redacted>")
            .field("location", &self.location)
            .field("niche", &self.niche)
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// Sign-in form.
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    /// Builds a form; the email is trimmed, the password is sent as typed.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    /// Local validation, as field-keyed messages.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|e| field_errors_from(&e))
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// First message per invalid field.
fn field_errors_from(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        if let Some(first) = errs.first() {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {field}"));
            out.insert(field.to_string(), message);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            email: "  seller@example.com ".to_string(),
            store_name: " Corner Shop ".to_string(),
            password: "hunter22".to_string(),
            location: " Lagos ".to_string(),
            niche: "fashion".to_string(),
            full_name: " Ada Obi ".to_string(),
        }
    }

    #[test]
    fn test_trimmed_strips_every_field() {
        let form = valid_form().trimmed();
        assert_eq!(form.email, "seller@example.com");
        assert_eq!(form.store_name, "Corner Shop");
        assert_eq!(form.location, "Lagos");
        assert_eq!(form.full_name, "Ada Obi");
        assert!(form.check().is_ok());
    }

    #[test]
    fn test_check_reports_fields() {
        let form = RegistrationForm {
            email: "not-an-email".to_string(),
            store_name: String::new(),
            ..valid_form()
        };
        let errors = form.trimmed().check().expect_err("invalid");
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
        assert_eq!(errors.get("store_name"), Some("Store name is required"));
        assert_eq!(errors.global_message(), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", LoginForm::new("a@b.co", "secret"));
        assert!(!rendered.contains("secret"));
    }
}
