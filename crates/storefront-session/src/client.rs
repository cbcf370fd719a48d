//! Process-wide client wiring.

use std::sync::Arc;

use tracing::info;

use storefront_core::config::AppConfig;
use storefront_core::result::AppResult;
use storefront_core::traits::KeyValueStore;

use crate::account::AccountClient;
use crate::http::HttpExecutor;
use crate::resources::StoreApi;
use crate::session::{Navigator, SessionManager};
use crate::storage::build_store;
use crate::token::TokenStore;

/// One token store, one executor, and the services built on them.
///
/// Every service shares the same token store, so a token committed by the
/// session manager is seen by every subsequent request.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    pub session: SessionManager,
    pub account: AccountClient,
    pub store: StoreApi,
}

impl StorefrontClient {
    /// Builds the client with the configured storage backend.
    pub fn from_config(config: &AppConfig, navigator: Arc<dyn Navigator>) -> AppResult<Self> {
        let storage = build_store(&config.storage)?;
        Self::with_storage(config, storage, navigator)
    }

    /// Builds the client on an explicit storage backend.
    pub fn with_storage(
        config: &AppConfig,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> AppResult<Self> {
        let backend = storage.backend_name();
        let token_store = Arc::new(TokenStore::new(storage));
        let executor = Arc::new(HttpExecutor::new(&config.api, token_store)?);

        let session = SessionManager::new(
            Arc::clone(&executor),
            navigator,
            config.session.clone(),
        );
        session.initialize();

        info!(
            base_url = %executor.base_url(),
            storage = backend,
            authenticated = session.is_authenticated(),
            "Storefront client ready"
        );

        Ok(Self {
            account: AccountClient::new(Arc::clone(&executor)),
            store: StoreApi::new(executor),
            session,
        })
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        self.session.token_store()
    }

    /// Stops background work. The session itself is kept.
    pub fn shutdown(&self) {
        self.session.shutdown();
    }
}
