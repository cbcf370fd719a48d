//! Shared domain types: typed identifiers, session state, tenant context.

pub mod id;
pub mod session;
pub mod tenant;

pub use id::{ListenerId, RequestId};
pub use session::{FieldErrors, SessionPhase, SessionSnapshot};
pub use tenant::TenantContext;
