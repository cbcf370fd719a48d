//! Persistent key-value storage trait for client-side session state.

use crate::result::AppResult;

/// Durable string key-value storage (the process analogue of browser
/// local storage).
///
/// Reads and writes are synchronous: the token store mirrors every change
/// while holding its state lock, so storage always matches memory once a
/// write returns.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> AppResult<()>;

    /// Backend name for diagnostics.
    fn backend_name(&self) -> &'static str;
}
