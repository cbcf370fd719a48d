//! Session lifecycle: sign-in, sign-up, sign-out and token renewal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use storefront_core::config::SessionConfig;
use storefront_core::types::{FieldErrors, SessionPhase, SessionSnapshot};

use super::errors::{
    INVALID_SERVER_RESPONSE, LOGIN_FAILED, REGISTRATION_FAILED, login_failure_message,
    registration_errors,
};
use super::forms::{LoginForm, RegistrationForm};
use super::navigator::{Destination, Navigator};
use super::renewal;
use crate::http::{ApiError, HttpExecutor, RequestOptions};
use crate::token::TokenStore;

/// Storage key the refresh token is persisted under.
pub const REFRESH_TOKEN_KEY: &str = "refresh";

const SIGNIN_PATH: &str = "/api/signin/";
const SIGNUP_PATH: &str = "/api/signup/";
const REFRESH_PATH: &str = "/api/token/refresh/";

/// Result of a single refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was committed.
    Refreshed,
    /// Another refresh was already running; nothing was sent.
    InFlight,
    /// No session to refresh.
    NotAuthenticated,
    /// The session changed while the request was out; its result was dropped.
    Discarded,
    /// The backend rejected the refresh and the session was ended.
    Failed,
}

#[derive(Debug, Default)]
struct SessionState {
    phase: SessionPhase,
    access_token: Option<String>,
    refresh_token: Option<String>,
    authenticated_at: Option<DateTime<Utc>>,
    last_refreshed_at: Option<DateTime<Utc>>,
    errors: FieldErrors,
    /// Bumped whenever a session starts or ends.
    epoch: u64,
    renewal: Option<CancellationToken>,
}

impl SessionState {
    fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            is_authenticated: self.is_authenticated(),
            authenticated_at: self.authenticated_at,
            last_refreshed_at: self.last_refreshed_at,
            errors: self.errors.clone(),
        }
    }

    fn cancel_renewal(&mut self) {
        if let Some(token) = self.renewal.take() {
            token.cancel();
        }
    }
}

pub(super) struct SessionInner {
    executor: Arc<HttpExecutor>,
    navigator: Arc<dyn Navigator>,
    config: SessionConfig,
    state: Mutex<SessionState>,
    refreshing: AtomicBool,
    snapshots: watch::Sender<SessionSnapshot>,
}

/// Owns the client session and publishes its state.
///
/// Cheap to clone; clones share the same session. Methods never return
/// errors: outcomes are reported as `bool` plus [`FieldErrors`] in the
/// published snapshot.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("SessionManager")
            .field("phase", &state.phase)
            .field("is_authenticated", &state.is_authenticated())
            .field("navigator", &self.inner.navigator)
            .finish()
    }
}

impl SessionManager {
    pub fn new(
        executor: Arc<HttpExecutor>,
        navigator: Arc<dyn Navigator>,
        config: SessionConfig,
    ) -> Self {
        let (snapshots, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(SessionInner {
                executor,
                navigator,
                config,
                state: Mutex::new(SessionState::default()),
                refreshing: AtomicBool::new(false),
                snapshots,
            }),
        }
    }

    pub(super) fn from_inner(inner: Arc<SessionInner>) -> Self {
        Self { inner }
    }

    /// Restores a persisted session. Reads storage only; no network.
    ///
    /// Only the first call has any effect. When exactly one of the two
    /// tokens is found, both are cleared.
    pub fn initialize(&self) {
        {
            let mut state = self.state();
            if state.phase != SessionPhase::Uninitialized {
                return;
            }
            state.phase = SessionPhase::Initializing;
            self.publish(&state);
        }

        let access = self.token_store().get_token();
        let refresh = self.read_refresh_token();

        let pending = {
            let mut state = self.state();
            let pending = match (access, refresh) {
                (Some(access), Some(refresh)) => {
                    state.access_token = Some(access);
                    state.refresh_token = Some(refresh);
                    state.phase = SessionPhase::Authenticated;
                    state.authenticated_at = Some(Utc::now());
                    self.start_renewal(&mut state);
                    info!("Restored persisted session");
                    None
                }
                (None, None) => {
                    state.phase = SessionPhase::Anonymous;
                    debug!("No persisted session");
                    None
                }
                (access, _) => {
                    warn!(
                        has_access = access.is_some(),
                        "Found a partial persisted session; clearing both tokens"
                    );
                    self.write_refresh_token(None);
                    state.phase = SessionPhase::Anonymous;
                    Some(self.token_store().stage(None))
                }
            };
            self.publish(&state);
            pending
        };

        if let Some(pending) = pending {
            pending.deliver();
        }
    }

    /// Creates a seller account. Never establishes a session.
    pub async fn register(&self, form: RegistrationForm) -> bool {
        let form = form.trimmed();
        if let Err(errors) = form.check() {
            self.set_errors(errors);
            return false;
        }
        self.set_errors(FieldErrors::new());

        let payload = json!({
            "email": form.email,
            "store_name": form.store_name,
            "password": form.password,
            "location": form.location,
            "niche": form.niche,
            "full_name": form.full_name,
        });
        let options = RequestOptions::post()
            .json(payload)
            .error_message(REGISTRATION_FAILED);

        match self.inner.executor.execute(SIGNUP_PATH, options).await {
            Ok(_) => {
                info!(email = %form.email, store_name = %form.store_name, "Seller registered");
                self.inner.navigator.navigate(Destination::Login);
                true
            }
            Err(e) => {
                let errors = registration_errors(&e);
                warn!(email = %form.email, error = %e, "Registration failed");
                self.set_errors(errors);
                false
            }
        }
    }

    /// Signs in and, on success, navigates to the dashboard exactly once.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let form = LoginForm::new(email, password);
        if let Err(errors) = form.check() {
            self.set_errors(errors);
            return false;
        }
        self.set_errors(FieldErrors::new());

        let options = RequestOptions::post()
            .json(json!({ "email": form.email, "password": form.password }))
            .error_message(LOGIN_FAILED);

        let body = match self.inner.executor.execute(SIGNIN_PATH, options).await {
            Ok(body) => body,
            Err(e) => {
                warn!(email = %form.email, status = ?e.status(), error = %e, "Login failed");
                self.set_errors(FieldErrors::global(login_failure_message(&e)));
                return false;
            }
        };

        let Some((access, refresh)) = extract_login_tokens(&body) else {
            warn!(email = %form.email, "Login response carried no usable tokens");
            self.set_errors(FieldErrors::global(INVALID_SERVER_RESPONSE));
            return false;
        };

        self.establish(access, refresh);
        info!(email = %form.email, "Logged in");
        self.inner.navigator.navigate(Destination::Dashboard);
        true
    }

    /// Ends the session. Synchronous, no network, always succeeds.
    pub fn logout(&self) {
        self.end_session(None);
        info!("Logged out");
    }

    /// Renews the access token with the stored refresh token.
    ///
    /// Returns `false` without a request when another refresh is running.
    /// Any backend failure ends the session.
    pub async fn refresh(&self) -> bool {
        self.refresh_outcome().await == RefreshOutcome::Refreshed
    }

    /// Renews the access token with an explicit refresh token.
    pub async fn refresh_with(&self, refresh_token: &str) -> bool {
        self.refresh_using(Some(refresh_token.to_string())).await == RefreshOutcome::Refreshed
    }

    /// Like [`refresh`](Self::refresh), reporting why nothing changed.
    pub async fn refresh_outcome(&self) -> RefreshOutcome {
        self.refresh_using(None).await
    }

    /// Stops background renewal without ending the session.
    pub fn shutdown(&self) {
        self.state().cancel_renewal();
        debug!("Session manager shut down");
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state().refresh_token.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase
    }

    pub fn errors(&self) -> FieldErrors {
        self.state().errors.clone()
    }

    pub fn clear_errors(&self) {
        self.set_errors(FieldErrors::new());
    }

    /// Drops the message attached to `field`.
    pub fn dismiss_error(&self, field: &str) {
        let mut state = self.state();
        if state.errors.remove(field).is_some() {
            self.publish(&state);
        }
    }

    /// Whether the background renewal task is scheduled.
    pub fn renewal_scheduled(&self) -> bool {
        self.state()
            .renewal
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    pub fn executor(&self) -> &Arc<HttpExecutor> {
        &self.inner.executor
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        self.inner.executor.token_store()
    }

    async fn refresh_using(&self, explicit: Option<String>) -> RefreshOutcome {
        if self
            .inner
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Token refresh already in flight");
            return RefreshOutcome::InFlight;
        }
        let _guard = InFlightGuard(&self.inner.refreshing);

        let (refresh_token, epoch) = {
            let state = self.state();
            if state.phase != SessionPhase::Authenticated {
                return RefreshOutcome::NotAuthenticated;
            }
            match explicit.or_else(|| state.refresh_token.clone()) {
                Some(token) => (token, state.epoch),
                None => return RefreshOutcome::NotAuthenticated,
            }
        };

        let options = RequestOptions::post()
            .json(json!({ "refresh": refresh_token }))
            .error_message("Token refresh failed");
        let access = self
            .inner
            .executor
            .execute(REFRESH_PATH, options)
            .await
            .and_then(|body| extract_access_token(&body).ok_or(ApiError::InvalidResponse));

        match access {
            Ok(access) => {
                let pending = {
                    let mut state = self.state();
                    if state.epoch != epoch || state.phase != SessionPhase::Authenticated {
                        debug!("Session changed during token refresh; result discarded");
                        return RefreshOutcome::Discarded;
                    }
                    state.access_token = Some(access.clone());
                    state.last_refreshed_at = Some(Utc::now());
                    self.publish(&state);
                    self.token_store().stage(Some(access))
                };
                pending.deliver();
                info!("Access token refreshed");
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                if self.end_session(Some(epoch)) {
                    warn!(status = ?e.status(), error = %e, "Token refresh failed; session ended");
                    RefreshOutcome::Failed
                } else {
                    debug!(error = %e, "Token refresh failed after the session changed");
                    RefreshOutcome::Discarded
                }
            }
        }
    }

    /// Commits both tokens together and schedules renewal.
    fn establish(&self, access: String, refresh: String) {
        let pending = {
            let mut state = self.state();
            state.cancel_renewal();
            state.epoch += 1;
            self.write_refresh_token(Some(&refresh));
            let pending = self.token_store().stage(Some(access.clone()));
            state.access_token = Some(access);
            state.refresh_token = Some(refresh);
            state.phase = SessionPhase::Authenticated;
            state.authenticated_at = Some(Utc::now());
            state.last_refreshed_at = None;
            state.errors.clear();
            self.start_renewal(&mut state);
            self.publish(&state);
            pending
        };
        pending.deliver();
    }

    /// Clears the session. With `expected_epoch`, only if no other session
    /// transition happened since; returns whether it cleared.
    fn end_session(&self, expected_epoch: Option<u64>) -> bool {
        let pending = {
            let mut state = self.state();
            if expected_epoch.is_some_and(|epoch| epoch != state.epoch) {
                return false;
            }
            state.cancel_renewal();
            state.epoch += 1;
            state.access_token = None;
            state.refresh_token = None;
            state.authenticated_at = None;
            state.last_refreshed_at = None;
            state.errors.clear();
            state.phase = SessionPhase::Anonymous;
            self.write_refresh_token(None);
            let pending = self.token_store().stage(None);
            self.publish(&state);
            pending
        };
        pending.deliver();
        true
    }

    fn start_renewal(&self, state: &mut SessionState) {
        if !self.inner.config.auto_refresh {
            return;
        }
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available; token renewal disabled");
                return;
            }
        };

        let cancel = CancellationToken::new();
        let interval = Duration::from_millis(self.inner.config.refresh_interval_ms);
        renewal::spawn(&handle, self.downgrade(), cancel.clone(), interval);
        state.renewal = Some(cancel);
    }

    fn downgrade(&self) -> Weak<SessionInner> {
        Arc::downgrade(&self.inner)
    }

    fn read_refresh_token(&self) -> Option<String> {
        let storage = self.token_store().storage();
        match storage.get(REFRESH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted refresh token");
                None
            }
        }
    }

    fn write_refresh_token(&self, token: Option<&str>) {
        let storage = self.token_store().storage();
        let result = match token {
            Some(value) => storage.set(REFRESH_TOKEN_KEY, value),
            None => storage.remove(REFRESH_TOKEN_KEY),
        };
        if let Err(e) = result {
            warn!(
                storage = storage.backend_name(),
                error = %e,
                "Failed to persist refresh token"
            );
        }
    }

    fn set_errors(&self, errors: FieldErrors) {
        let mut state = self.state();
        state.errors = errors;
        self.publish(&state);
    }

    fn publish(&self, state: &SessionState) {
        self.inner.snapshots.send_replace(state.snapshot());
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Releases the in-flight refresh flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// `tokens.access` and `tokens.refresh`, both non-empty.
fn extract_login_tokens(body: &Value) -> Option<(String, String)> {
    let tokens = body.get("tokens")?;
    let access = non_empty_string(tokens.get("access"))?;
    let refresh = non_empty_string(tokens.get("refresh"))?;
    Some((access, refresh))
}

fn extract_access_token(body: &Value) -> Option<String> {
    non_empty_string(body.get("access"))
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extract_login_tokens_requires_both() {
        let body = json!({"tokens": {"access": "A", "refresh": "R"}});
        assert_eq!(
            extract_login_tokens(&body),
            Some(("A".to_string(), "R".to_string()))
        );

        assert_eq!(extract_login_tokens(&json!({"tokens": {"access": "A"}})), None);
        assert_eq!(
            extract_login_tokens(&json!({"tokens": {"access": "", "refresh": "R"}})),
            None
        );
        assert_eq!(extract_login_tokens(&json!({"access": "A", "refresh": "R"})), None);
        assert_eq!(extract_login_tokens(&Value::Null), None);
    }

    #[test]
    fn test_extract_access_token() {
        assert_eq!(extract_access_token(&json!({"access": "A2"})).as_deref(), Some("A2"));
        assert_eq!(extract_access_token(&json!({"access": 7})), None);
        assert_eq!(extract_access_token(&json!({})), None);
    }

    #[test]
    fn test_in_flight_guard_releases_flag() {
        let flag = AtomicBool::new(true);
        {
            let _guard = InFlightGuard(&flag);
        }
        assert!(!flag.load(Ordering::Acquire));
    }
}
