//! Typed wrappers over the authenticated store endpoints.

pub mod faq;
pub mod store;

pub use faq::Faq;
pub use store::{Store, StoreApi, UploadKind};
