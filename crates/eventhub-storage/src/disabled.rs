//! No-op storage provider modelling unavailable browser storage.

use async_trait::async_trait;

use eventhub_core::result::AppResult;
use eventhub_core::traits::storage::{KeyValueStore, SharedWatch, StoreScope};

/// Storage provider for environments where the underlying storage is
/// inaccessible (disabled by the user or the embedder).
///
/// Every read resolves to `Ok(None)` and every write is accepted and
/// dropped. Nothing here ever returns an error: callers degrade on empty
/// reads instead of handling failures. Cross-tab awareness is off, so
/// [`subscribe`](KeyValueStore::subscribe) yields no watch and consumers
/// fall back to TTL-only invalidation.
#[derive(Debug, Default, Clone)]
pub struct DisabledStore;

impl DisabledStore {
    /// Create a disabled store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueStore for DisabledStore {
    async fn get(&self, _scope: StoreScope, _key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _scope: StoreScope, _key: &str, _value: &str) -> AppResult<()> {
        Ok(())
    }

    async fn remove(&self, _scope: StoreScope, _key: &str) -> AppResult<()> {
        Ok(())
    }

    fn subscribe(&self) -> Option<SharedWatch> {
        None
    }

    fn shared_available(&self) -> bool {
        false
    }
}
