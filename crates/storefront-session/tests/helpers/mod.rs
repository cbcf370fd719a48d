//! Shared test helpers: an in-process mock of the storefront backend.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{any, get, post, put};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use storefront_core::config::{ApiConfig, AppConfig, SessionConfig, StorageBackend};
use storefront_core::traits::KeyValueStore;
use storefront_session::session::{Destination, Navigator};
use storefront_session::storage::MemoryStore;
use storefront_session::StorefrontClient;

/// Password the mock accepts for every account.
pub const PASSWORD: &str = "secret";

/// Counters and knobs shared with the mock's handlers.
#[derive(Debug)]
pub struct MockState {
    pub signin_calls: AtomicUsize,
    pub signup_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub refresh_delay_ms: AtomicU64,
    pub refresh_status: AtomicU16,
    pub last_body: Mutex<Option<Value>>,
    pub signup_response: Mutex<Option<(StatusCode, Value)>>,
    pub faqs: Mutex<Vec<Value>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            signin_calls: AtomicUsize::new(0),
            signup_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            refresh_delay_ms: AtomicU64::new(0),
            refresh_status: AtomicU16::new(200),
            last_body: Mutex::new(None),
            signup_response: Mutex::new(None),
            faqs: Mutex::new(vec![json!({"id": 1, "question": "Do you ship?", "answer": "Yes"})]),
        }
    }
}

impl MockState {
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        self.refresh_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_refresh_status(&self, status: StatusCode) {
        self.refresh_status.store(status.as_u16(), Ordering::SeqCst);
    }

    pub fn set_signup_response(&self, status: StatusCode, body: Value) {
        *self.signup_response.lock().unwrap() = Some((status, body));
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    fn record(&self, body: &Value) {
        *self.last_body.lock().unwrap() = Some(body.clone());
    }
}

/// Mock backend listening on an ephemeral port.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new()
            .route("/api/signin/", post(signin))
            .route("/api/signup/", post(signup))
            .route("/api/token/refresh/", post(refresh))
            .route("/echo/", any(echo))
            .route("/empty/", any(|| async { StatusCode::NO_CONTENT }))
            .route(
                "/fail/",
                get(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"detail": "Boom"})),
                    )
                }),
            )
            .route(
                "/fail-plain/",
                get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
            )
            .route("/not-json/", get(|| async { Html("<html>ok</html>") }))
            .route(
                "/slow/",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({"ok": true}))
                }),
            )
            .route("/password-reset/", post(password_reset))
            .route("/reset-password/{uid}/{token}/", post(reset_password))
            .route("/store/", get(store).patch(update_store))
            .route("/store/faqs/", get(list_faqs).post(create_faq))
            .route("/store/faqs/{id}/", put(update_faq).delete(delete_faq))
            .route("/logo/", post(upload))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }
}

/// Navigator that records every request.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub visits: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<Destination> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.visits.lock().unwrap().push(destination);
    }
}

/// Client wired against a running mock backend.
pub struct TestClient {
    pub backend: MockBackend,
    pub storage: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: StorefrontClient,
}

impl TestClient {
    /// Client with background renewal disabled.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        Self::start_on_storage(MemoryStore::new(), configure).await
    }

    pub async fn start_on_storage(
        storage: MemoryStore,
        configure: impl FnOnce(&mut AppConfig),
    ) -> Self {
        let backend = MockBackend::start().await;
        let mut config = test_config(&backend.base_url);
        configure(&mut config);

        let storage = Arc::new(storage);
        let navigator = Arc::new(RecordingNavigator::default());
        let client = StorefrontClient::with_storage(&config, storage.clone(), navigator.clone())
            .expect("Failed to build client");

        Self {
            backend,
            storage,
            navigator,
            client,
        }
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get(key).expect("storage read")
    }

    pub async fn login(&self) {
        assert!(
            self.client
                .session
                .login("seller@example.com", PASSWORD)
                .await
        );
    }
}

pub fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api = ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_ms: 2_000,
        ..ApiConfig::default()
    };
    config.session = SessionConfig {
        refresh_interval_ms: 100,
        auto_refresh: false,
    };
    config.storage.backend = StorageBackend::Memory;
    config
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn signin(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.signin_calls.fetch_add(1, Ordering::SeqCst);
    state.record(&body);

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if email == "down@example.com" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Database unavailable"})),
        )
            .into_response();
    }
    if password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
            .into_response();
    }
    if email == "broken@example.com" {
        return Json(json!({"tokens": {"access": "A"}})).into_response();
    }
    Json(json!({"tokens": {"access": "A", "refresh": "R"}})).into_response()
}

async fn signup(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.signup_calls.fetch_add(1, Ordering::SeqCst);
    state.record(&body);

    match state.signup_response.lock().unwrap().clone() {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (
            StatusCode::CREATED,
            Json(json!({"message": "Account created"})),
        )
            .into_response(),
    }
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let n = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    state.record(&body);

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let status = StatusCode::from_u16(state.refresh_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::OK);
    if !status.is_success() {
        return (
            status,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response();
    }
    Json(json!({"access": format!("A{n}")})).into_response()
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({
        "method": method.as_str(),
        "authorization": bearer(&headers),
        "content_type": content_type,
        "length": body.len(),
    }))
}

async fn password_reset(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    state.record(&body);
    Json(json!({"message": "Reset link sent"}))
}

async fn reset_password(
    State(state): State<Arc<MockState>>,
    Path((_uid, token)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    state.record(&body);
    if token == "expired" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid or expired token"})),
        )
            .into_response();
    }
    Json(json!({"message": "Password updated"})).into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
        .into_response()
}

async fn store(headers: HeaderMap) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({
        "id": 1,
        "store_name": "Corner Shop",
        "subdomain": "corner",
        "currency": "NGN"
    }))
    .into_response()
}

async fn update_store(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    state.record(&body);
    let name = body["store_name"].as_str().unwrap_or("Corner Shop");
    Json(json!({"id": 1, "store_name": name, "subdomain": "corner"})).into_response()
}

async fn list_faqs(State(state): State<Arc<MockState>>) -> Json<Value> {
    Json(Value::Array(state.faqs.lock().unwrap().clone()))
}

async fn create_faq(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let mut faqs = state.faqs.lock().unwrap();
    let id = faqs.len() as i64 + 1;
    let faq = json!({"id": id, "question": body["question"], "answer": body["answer"]});
    faqs.push(faq.clone());
    (StatusCode::CREATED, Json(faq)).into_response()
}

async fn update_faq(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut faqs = state.faqs.lock().unwrap();
    match faqs.iter_mut().find(|f| f["id"] == id) {
        Some(faq) => {
            faq["question"] = body["question"].clone();
            faq["answer"] = body["answer"].clone();
            Json(faq.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn delete_faq(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> StatusCode {
    let mut faqs = state.faqs.lock().unwrap();
    let before = faqs.len();
    faqs.retain(|f| f["id"] != id);
    if faqs.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn upload(headers: HeaderMap, body: Bytes) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({
        "logo": "/media/logo.png",
        "content_type": content_type,
        "length": body.len(),
    }))
    .into_response()
}
