//! Host-based tenant resolution.

pub mod resolver;

pub use resolver::{Resolution, is_local_host, resolve, resolve_context, strip_port};
