//! Authenticated, time-bounded HTTP request execution against the backend.

pub mod error;
pub mod executor;
pub mod request;

pub use error::ApiError;
pub use executor::HttpExecutor;
pub use request::{RequestBody, RequestOptions};
