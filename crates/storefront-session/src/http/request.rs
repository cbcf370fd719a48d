//! Request description handed to the executor.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use serde_json::Value;

/// Fallback error message when the backend gives none.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Request payload.
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// Raw bytes sent with the caller's content type.
    Binary {
        /// Payload.
        data: Bytes,
        /// Content type sent verbatim.
        content_type: String,
    },
    /// Multipart form; the boundary content type is generated by the form.
    Multipart(Form),
}

/// Method, body, headers, fallback message and timeout for one call.
#[derive(Debug)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Payload.
    pub body: RequestBody,
    /// Extra headers; applied last so they override the defaults.
    pub headers: HeaderMap,
    /// Message used when an error body carries no `detail`/`message`.
    pub error_message: String,
    /// Overrides the executor's default timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options for `method` with no body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            timeout: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Send `value` as JSON.
    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Send raw bytes with `content_type`.
    pub fn binary(mut self, data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.body = RequestBody::Binary {
            data: data.into(),
            content_type: content_type.into(),
        };
        self
    }

    /// Send a multipart form.
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Add a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Message to report when the backend's error body has none.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
