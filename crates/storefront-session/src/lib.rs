//! # storefront-session
//!
//! Client-side session runtime for the SellExplore storefront.
//!
//! ## Modules
//!
//! - `storage`: persistent key-value backends (memory, JSON file)
//! - `token`: process-wide access token holder with change notification
//! - `http`: authenticated, time-bounded request executor
//! - `session`: login, registration, logout and silent token renewal
//! - `account`: password reset flows
//! - `resources`: store, configuration, image and FAQ endpoints
//! - `client`: wires everything above from configuration

pub mod account;
pub mod client;
pub mod http;
pub mod resources;
pub mod session;
pub mod storage;
pub mod token;

pub use account::AccountClient;
pub use client::StorefrontClient;
pub use http::{ApiError, HttpExecutor, RequestOptions};
pub use resources::{Faq, Store, StoreApi};
pub use session::{
    Destination, LoginForm, Navigator, NoopNavigator, RefreshOutcome, RegistrationForm,
    SessionManager,
};
pub use storage::{FileStore, MemoryStore, build_store};
pub use token::TokenStore;
