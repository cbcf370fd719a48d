//! Session state types published by the session manager.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the client session.
///
/// `Uninitialized → Initializing → {Anonymous, Authenticated}`; afterwards
/// only login (`Anonymous → Authenticated`) and logout or refresh failure
/// (`Authenticated → Anonymous`) move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// The manager has been constructed but not initialized.
    #[default]
    Uninitialized,
    /// Persisted tokens are being read.
    Initializing,
    /// No session is held.
    Anonymous,
    /// Both tokens are held.
    Authenticated,
}

impl SessionPhase {
    /// Whether this phase carries a live session.
    pub fn is_authenticated(self) -> bool {
        self == Self::Authenticated
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Anonymous => write!(f, "anonymous"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Field-keyed user-facing error messages.
///
/// The reserved key [`FieldErrors::GLOBAL`] carries failures that do not
/// belong to a single form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Reserved key for non-field failures.
    pub const GLOBAL: &'static str = "global";

    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map holding a single global message.
    pub fn global(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.set_global(message);
        errors
    }

    /// Create a map holding a single field message.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Set the message for `field`, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Set the global message.
    pub fn set_global(&mut self, message: impl Into<String>) {
        self.insert(Self::GLOBAL, message);
    }

    /// Message attached to `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// The global message, if any.
    pub fn global_message(&self) -> Option<&str> {
        self.get(Self::GLOBAL)
    }

    /// Dismiss the message attached to `field`.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether no message is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with a message.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Read-only view of the session, published on every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub phase: SessionPhase,
    /// True iff both tokens are held.
    pub is_authenticated: bool,
    /// When the session was established (login or rehydration).
    pub authenticated_at: Option<DateTime<Utc>>,
    /// When the access token was last renewed.
    pub last_refreshed_at: Option<DateTime<Utc>>,
    /// User-facing error messages from the last action.
    pub errors: FieldErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_key_is_reserved() {
        let errors = FieldErrors::global("Network error");
        assert_eq!(errors.global_message(), Some("Network error"));
        assert_eq!(errors.get("global"), Some("Network error"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_errors_serialize_flat() {
        let mut errors = FieldErrors::field("email", "Email already exists");
        errors.set_global("Registration failed");
        let json = serde_json::to_value(&errors).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"email": "Email already exists", "global": "Registration failed"})
        );
    }

    #[test]
    fn test_phase_authenticated() {
        assert!(SessionPhase::Authenticated.is_authenticated());
        assert!(!SessionPhase::Initializing.is_authenticated());
        assert_eq!(SessionPhase::default(), SessionPhase::Uninitialized);
    }
}
