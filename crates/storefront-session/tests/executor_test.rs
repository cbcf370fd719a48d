//! Integration tests for the HTTP executor.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use storefront_core::config::ApiConfig;
use storefront_session::http::{ApiError, HttpExecutor, RequestOptions};
use storefront_session::storage::MemoryStore;
use storefront_session::token::TokenStore;

use helpers::MockBackend;

fn executor(base_url: &str) -> HttpExecutor {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_ms: 2_000,
        ..ApiConfig::default()
    };
    let tokens = Arc::new(TokenStore::new(Arc::new(MemoryStore::new())));
    HttpExecutor::new(&config, tokens).expect("executor")
}

#[tokio::test]
async fn test_bearer_follows_token_store() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let body = executor
        .execute("/echo/", RequestOptions::get())
        .await
        .expect("echo");
    assert_eq!(body["authorization"], Value::Null);

    executor.token_store().set_token(Some("A".to_string()));
    let body = executor
        .execute("/echo/", RequestOptions::get())
        .await
        .expect("echo");
    assert_eq!(body["authorization"], "Bearer A");

    executor.token_store().clear();
    let body = executor
        .execute("/echo/", RequestOptions::get())
        .await
        .expect("echo");
    assert_eq!(body["authorization"], Value::Null);
}

#[tokio::test]
async fn test_json_content_type() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let body = executor
        .execute("/echo/", RequestOptions::post().json(json!({"a": 1})))
        .await
        .expect("echo");
    assert_eq!(body["method"], "POST");
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["length"], 7);
}

#[tokio::test]
async fn test_binary_content_type_preserved() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let options = RequestOptions::put().binary(vec![0u8, 1, 2, 3], "image/png");
    let body = executor.execute("/echo/", options).await.expect("echo");
    assert_eq!(body["content_type"], "image/png");
    assert_eq!(body["length"], 4);
}

#[tokio::test]
async fn test_multipart_boundary_preserved() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let form = Form::new().part("logo", Part::bytes(vec![1u8, 2, 3]).file_name("logo.png"));
    let body = executor
        .execute("/echo/", RequestOptions::post().multipart(form))
        .await
        .expect("echo");
    let content_type = body["content_type"].as_str().expect("content type");
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_no_content_is_null() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let body = executor
        .execute("/empty/", RequestOptions::delete())
        .await
        .expect("empty");
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_error_detail_becomes_message() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let err = executor
        .execute("/fail/", RequestOptions::get().error_message("Could not load"))
        .await
        .expect_err("500");
    match err {
        ApiError::Status {
            status,
            message,
            body,
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Boom");
            assert_eq!(body, Some(json!({"detail": "Boom"})));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_uses_fallback() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let err = executor
        .execute(
            "/fail-plain/",
            RequestOptions::get().error_message("Could not load"),
        )
        .await
        .expect_err("502");
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Could not load");
    assert!(err.body().is_none());
}

#[tokio::test]
async fn test_success_without_json_is_invalid_response() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let err = executor
        .execute("/not-json/", RequestOptions::get())
        .await
        .expect_err("html");
    assert!(matches!(err, ApiError::InvalidResponse));
    assert_eq!(err.to_string(), "Invalid response format");
}

#[tokio::test]
async fn test_timeout_aborts_request() {
    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let started = std::time::Instant::now();
    let err = executor
        .execute(
            "/slow/",
            RequestOptions::get().timeout(Duration::from_millis(100)),
        )
        .await
        .expect_err("timeout");

    assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_millis(100)));
    assert!(err.is_transport());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_typed_decode_mismatch() {
    #[derive(Debug, serde::Deserialize)]
    struct Store {
        #[allow(dead_code)]
        store_name: String,
    }

    let backend = MockBackend::start().await;
    let executor = executor(&backend.base_url);

    let err = executor
        .execute_as::<Store>("/echo/", RequestOptions::get())
        .await
        .expect_err("shape mismatch");
    assert!(matches!(err, ApiError::InvalidResponse));
}
