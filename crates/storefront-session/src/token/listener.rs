//! Token change subscribers.

use std::sync::Arc;

use storefront_core::result::AppResult;
use storefront_core::types::ListenerId;

/// Callback invoked with the new access token (`None` once cleared).
pub type TokenListener = Arc<dyn Fn(Option<&str>) -> AppResult<()> + Send + Sync>;

/// Ordered set of subscribers.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<(ListenerId, TokenListener)>,
}

impl ListenerRegistry {
    pub(crate) fn insert(&mut self, listener: TokenListener) -> ListenerId {
        let id = ListenerId::new();
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Registration-ordered copy, so callbacks run without the registry lock.
    pub(crate) fn snapshot(&self) -> Vec<(ListenerId, TokenListener)> {
        self.entries.clone()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.entries.len())
            .finish()
    }
}
