//! Typed outcome of a failed backend request.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use storefront_core::error::{AppError, ErrorKind};

/// Error produced by [`HttpExecutor`](super::HttpExecutor).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The backend could not be reached or the connection broke.
    #[error("Network error: {0}")]
    Transport(String),
    /// The request did not complete in time and was aborted.
    #[error("Request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail`/`message` from the body, or the caller's fallback.
        message: String,
        /// Parsed JSON body, when there was one.
        body: Option<Value>,
    },
    /// A success status carried a body that is not valid JSON for the
    /// expected shape.
    #[error("Invalid response format")]
    InvalidResponse,
    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status, for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body, for `Status` errors.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether the failure happened below HTTP (unreachable, reset, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let kind = match &err {
            ApiError::Transport(_) | ApiError::Timeout(_) => ErrorKind::ExternalService,
            ApiError::Status { status: 401, .. } => ErrorKind::Authentication,
            ApiError::Status { status: 403, .. } => ErrorKind::Authorization,
            ApiError::Status { status: 404, .. } => ErrorKind::NotFound,
            ApiError::Status { status: 409, .. } => ErrorKind::Conflict,
            ApiError::Status { status, .. } if (400..500).contains(status) => ErrorKind::Validation,
            ApiError::Status { .. } => ErrorKind::ExternalService,
            ApiError::InvalidResponse => ErrorKind::Serialization,
            ApiError::InvalidRequest(_) => ErrorKind::Validation,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_app_error_kind() {
        let err = ApiError::Status {
            status: 401,
            message: "Token is invalid".to_string(),
            body: None,
        };
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::Authentication);
        assert_eq!(app.message, "Token is invalid");

        let app: AppError = ApiError::Timeout(Duration::from_millis(10_000)).into();
        assert_eq!(app.kind, ErrorKind::ExternalService);
        assert_eq!(app.message, "Request timed out after 10000 ms");
    }
}
