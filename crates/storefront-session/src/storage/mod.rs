//! Persistence backends for client session state.

pub mod file;
pub mod memory;

use std::sync::Arc;

use storefront_core::config::{StorageBackend, StorageConfig};
use storefront_core::result::AppResult;
use storefront_core::traits::KeyValueStore;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Builds the configured persistence backend.
pub fn build_store(config: &StorageConfig) -> AppResult<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::File => Ok(Arc::new(FileStore::open(&config.path)?)),
    }
}
