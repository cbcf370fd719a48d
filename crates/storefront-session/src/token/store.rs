//! Token store: the single in-process owner of the bearer token.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use tracing::{debug, error, warn};

use storefront_core::result::AppResult;
use storefront_core::traits::KeyValueStore;
use storefront_core::types::ListenerId;

use super::listener::{ListenerRegistry, TokenListener};

/// Storage key the access token is mirrored under.
pub const ACCESS_TOKEN_KEY: &str = "access";

/// Holds the current access token, mirrors it to persistent storage and
/// notifies subscribers when it changes.
///
/// Memory is authoritative: storage failures are logged and swallowed.
pub struct TokenStore {
    /// Current token.
    token: Mutex<Option<String>>,
    /// Last value announced to subscribers. Held across a notification
    /// cycle so announcements from different threads never interleave.
    delivered: Mutex<Option<String>>,
    /// Subscribers in registration order.
    listeners: Mutex<ListenerRegistry>,
    /// Threads currently running a notification cycle.
    notifying: Mutex<HashSet<ThreadId>>,
    /// Durable mirror.
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_token", &lock(&self.token).is_some())
            .field("storage", &self.storage.backend_name())
            .finish()
    }
}

/// A token change that has been committed but not yet announced.
///
/// Lets callers commit a token together with their own state under their
/// own lock, then notify subscribers once that lock is released.
#[must_use = "subscribers are only notified by `deliver`"]
pub struct PendingNotification<'a> {
    store: &'a TokenStore,
    changed: bool,
}

impl PendingNotification<'_> {
    /// Notify subscribers of the token held now.
    ///
    /// A change superseded by a later one before delivery is announced as
    /// the later value, so subscribers always end on `get_token()`.
    pub fn deliver(self) {
        if self.changed {
            self.store.notify();
        }
    }
}

impl TokenStore {
    /// Create a store backed by `storage`, rehydrating the token from it.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            token: Mutex::new(None),
            delivered: Mutex::new(None),
            listeners: Mutex::new(ListenerRegistry::default()),
            notifying: Mutex::new(HashSet::new()),
            storage,
        };
        store.initialize_from_storage();
        store
    }

    /// Reads the persisted token once. Never fails: a missing or unreadable
    /// key leaves the token unset.
    fn initialize_from_storage(&self) {
        match self.storage.get(ACCESS_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                debug!(storage = self.storage.backend_name(), "Restored access token");
                *lock(&self.token) = Some(token.clone());
                *lock(&self.delivered) = Some(token);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read persisted access token");
            }
        }
    }

    /// The in-memory token. Never touches storage.
    pub fn get_token(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    /// Replace the token and notify subscribers.
    ///
    /// Setting the value already held is a no-op: nothing is written and
    /// nobody is notified.
    pub fn set_token(&self, token: Option<String>) {
        self.stage(token).deliver();
    }

    /// Equivalent to `set_token(None)`.
    pub fn clear(&self) {
        self.set_token(None);
    }

    /// Commit `token` to memory and storage without notifying yet.
    pub fn stage(&self, token: Option<String>) -> PendingNotification<'_> {
        let mut current = lock(&self.token);
        if *current == token {
            return PendingNotification {
                store: self,
                changed: false,
            };
        }

        self.persist(token.as_deref());
        *current = token;

        PendingNotification {
            store: self,
            changed: true,
        }
    }

    /// Register a subscriber. Subscribers are called in registration order.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&str>) -> AppResult<()> + Send + Sync + 'static,
    {
        let listener: TokenListener = Arc::new(listener);
        lock(&self.listeners).insert(listener)
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        lock(&self.listeners).remove(id)
    }

    /// Number of registered subscribers.
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// The persistence backend, shared with the session manager.
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    fn persist(&self, token: Option<&str>) {
        let result = match token {
            Some(value) => self.storage.set(ACCESS_TOKEN_KEY, value),
            None => self.storage.remove(ACCESS_TOKEN_KEY),
        };

        if let Err(e) = result {
            warn!(
                storage = self.storage.backend_name(),
                error = %e,
                "Failed to persist access token; keeping in-memory value"
            );
        }
    }

    fn notify(&self) {
        let Some(_guard) = NotifyGuard::enter(&self.notifying) else {
            debug!("Token changed inside a listener; nested notification skipped");
            return;
        };

        let mut delivered = lock(&self.delivered);
        let token = self.get_token();
        if *delivered == token {
            debug!("Token change already announced");
            return;
        }
        delivered.clone_from(&token);

        let listeners = lock(&self.listeners).snapshot();
        for (id, listener) in listeners {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(token.as_deref()))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(listener_id = %id, error = %e, "Token listener failed");
                }
                Err(_) => {
                    error!(listener_id = %id, "Token listener panicked");
                }
            }
        }
    }
}

/// Marks the current thread as notifying for the lifetime of the guard.
struct NotifyGuard<'a> {
    threads: &'a Mutex<HashSet<ThreadId>>,
    id: ThreadId,
}

impl<'a> NotifyGuard<'a> {
    /// Returns `None` if this thread is already inside a notification cycle.
    fn enter(threads: &'a Mutex<HashSet<ThreadId>>) -> Option<Self> {
        let id = thread::current().id();
        if !lock(threads).insert(id) {
            return None;
        }
        Some(Self { threads, id })
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        lock(self.threads).remove(&self.id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}
