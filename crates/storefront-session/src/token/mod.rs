//! Process-wide bearer token holder with persistence and change notification.

pub mod listener;
pub mod store;

pub use listener::TokenListener;
pub use store::{ACCESS_TOKEN_KEY, PendingNotification, TokenStore};
