//! # storefront-core
//!
//! Core crate for the SellExplore storefront runtime. Contains configuration
//! schemas, typed identifiers, the session and tenant value types, the
//! key-value persistence trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other storefront crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
