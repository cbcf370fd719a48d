//! Session lifecycle: login, registration, logout, and silent renewal.

pub mod errors;
pub mod forms;
pub mod manager;
pub mod navigator;
mod renewal;

pub use forms::{LoginForm, RegistrationForm};
pub use manager::{REFRESH_TOKEN_KEY, RefreshOutcome, SessionManager};
pub use navigator::{Destination, Navigator, NoopNavigator};
