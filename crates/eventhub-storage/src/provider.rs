//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use eventhub_core::config::store::StoreConfig;
use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::traits::storage::{KeyValueStore, SharedWatch, StoreScope};

use crate::memory::{MemoryStore, SharedDirectory};

/// Store manager that wraps the configured key-value provider.
///
/// The provider is selected at construction time based on configuration.
/// One manager corresponds to one tab context; managers built over the
/// same [`SharedDirectory`] share the shared scope.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner storage provider.
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub fn new(config: &StoreConfig, shared: Arc<SharedDirectory>) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            "memory" => {
                info!("Initializing in-memory storage provider");
                Arc::new(MemoryStore::new(shared))
            }
            "disabled" => {
                info!("Storage unavailable, running in degraded mode");
                Arc::new(crate::disabled::DisabledStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: memory, disabled"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: provider }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    async fn get(&self, scope: StoreScope, key: &str) -> AppResult<Option<String>> {
        self.inner.get(scope, key).await
    }

    async fn set(&self, scope: StoreScope, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(scope, key, value).await
    }

    async fn remove(&self, scope: StoreScope, key: &str) -> AppResult<()> {
        self.inner.remove(scope, key).await
    }

    fn subscribe(&self) -> Option<SharedWatch> {
        self.inner.subscribe()
    }

    fn shared_available(&self) -> bool {
        self.inner.shared_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_by_provider_name() {
        let shared = SharedDirectory::new();

        let memory = StoreManager::new(
            &StoreConfig {
                provider: "memory".to_string(),
            },
            Arc::clone(&shared),
        )
        .unwrap();
        assert!(memory.shared_available());

        let disabled = StoreManager::new(
            &StoreConfig {
                provider: "disabled".to_string(),
            },
            Arc::clone(&shared),
        )
        .unwrap();
        assert!(!disabled.shared_available());

        let unknown = StoreManager::new(
            &StoreConfig {
                provider: "redis".to_string(),
            },
            shared,
        );
        assert!(unknown.is_err());
    }

    #[tokio::test]
    async fn test_manager_delegates_to_the_wrapped_provider() {
        let shared = SharedDirectory::new();
        let manager = StoreManager::from_provider(Arc::new(MemoryStore::new(shared)));

        manager
            .set(StoreScope::Shared, "activeSessions", "{}")
            .await
            .unwrap();
        assert_eq!(
            manager.provider().shared_available(),
            manager.shared_available()
        );
        assert_eq!(
            manager
                .get(StoreScope::Shared, "activeSessions")
                .await
                .unwrap(),
            Some("{}".to_string())
        );
    }
}
