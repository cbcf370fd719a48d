//! # storefront-edge
//!
//! Edge HTTP application for the SellExplore storefront built on Axum.
//!
//! Resolves the tenant from the request host and rewrites tenant requests
//! under the vendor prefix before routing, serves static assets, and
//! describes the resolved page route.

pub mod app;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tenant;

pub use app::{build_app, run_server};
pub use state::EdgeState;
pub use tenant::{Resolution, resolve};
