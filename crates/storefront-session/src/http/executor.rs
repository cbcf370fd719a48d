//! The shared, token-aware HTTP client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use storefront_core::config::ApiConfig;
use storefront_core::error::{AppError, ErrorKind};
use storefront_core::result::AppResult;

use super::error::ApiError;
use super::request::{RequestBody, RequestOptions};
use crate::token::TokenStore;

const APPLICATION_JSON: &str = "application/json";

/// Performs one authenticated, time-bounded call and normalizes the result
/// into either a JSON value or an [`ApiError`].
///
/// One executor is built per process and shared by every caller.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    /// Underlying connection pool.
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Source of the bearer token.
    token_store: Arc<TokenStore>,
    /// Timeout applied when a call does not set its own.
    default_timeout: Duration,
}

impl HttpExecutor {
    /// Builds an executor from API configuration.
    pub fn new(config: &ApiConfig, token_store: Arc<TokenStore>) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_store,
            default_timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    /// The token store consulted for every request.
    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.token_store
    }

    /// Base URL all paths are joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a resource path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Executes a request and returns the decoded JSON body.
    ///
    /// `204 No Content` yields `Value::Null`. The whole exchange, body
    /// included, is bounded by the timeout; the request is dropped when it
    /// expires.
    pub async fn execute(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let url = self.url(path);
        let method = options.method.clone();
        let fallback = options.error_message.clone();
        let request = self.build_request(&url, options);

        let start = Instant::now();
        let result = match tokio::time::timeout(timeout, Self::send(request, fallback)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(timeout)),
        };

        match &result {
            Ok(_) => {
                debug!(
                    method = %method,
                    path = %path,
                    duration_ms = %start.elapsed().as_millis(),
                    "Backend request completed"
                );
            }
            Err(e) => {
                warn!(
                    method = %method,
                    path = %path,
                    status = ?e.status(),
                    duration_ms = %start.elapsed().as_millis(),
                    error = %e,
                    "Backend request failed"
                );
            }
        }

        result
    }

    /// Executes a request and decodes the body into `T`.
    ///
    /// A body that does not match `T` is reported as
    /// [`ApiError::InvalidResponse`].
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.execute(path, options).await?;
        serde_json::from_value(value).map_err(|_| ApiError::InvalidResponse)
    }

    fn build_request(&self, url: &str, options: RequestOptions) -> RequestBuilder {
        let mut builder = self.client.request(options.method, url);

        if let Some(token) = self.token_store.get_token() {
            builder = builder.bearer_auth(token);
        }

        builder = match options.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, APPLICATION_JSON),
            RequestBody::Json(value) => builder
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .body(value.to_string()),
            RequestBody::Binary { data, content_type } => {
                match HeaderValue::from_str(&content_type) {
                    Ok(value) => builder.header(CONTENT_TYPE, value).body(data),
                    Err(_) => {
                        warn!(content_type = %content_type, "Dropping invalid content type");
                        builder.body(data)
                    }
                }
            }
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        if !options.headers.is_empty() {
            builder = builder.headers(options.headers);
        }

        builder
    }

    async fn send(request: RequestBuilder, fallback: String) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            let message = body
                .as_ref()
                .and_then(error_message_from_body)
                .unwrap_or(fallback);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
                body,
            });
        }

        serde_json::from_slice(&bytes).map_err(|_| ApiError::InvalidResponse)
    }
}

/// Extracts a human-readable message from an error body: `detail` first,
/// then `message`.
pub fn error_message_from_body(body: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_error_message_prefers_detail() {
        let body = json!({"detail": "Not authorized", "message": "ignored"});
        assert_eq!(
            error_message_from_body(&body).as_deref(),
            Some("Not authorized")
        );

        let body = json!({"message": "Store not found"});
        assert_eq!(
            error_message_from_body(&body).as_deref(),
            Some("Store not found")
        );

        assert_eq!(error_message_from_body(&json!({"error": "x"})), None);
        assert_eq!(error_message_from_body(&json!({"detail": 3})), None);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ApiConfig::default()
        };
        let store = Arc::new(TokenStore::new(Arc::new(MemoryStore::new())));
        let executor = HttpExecutor::new(&config, store).expect("executor");

        assert_eq!(executor.url("/api/signin/"), "http://localhost:8000/api/signin/");
        assert_eq!(executor.url("store/"), "http://localhost:8000/store/");
    }
}
