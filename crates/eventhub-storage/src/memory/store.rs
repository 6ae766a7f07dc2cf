//! In-memory scoped storage built on dashmap.
//!
//! One [`MemoryStore`] corresponds to one browsing context (tab). All
//! stores created from the same [`SharedDirectory`] see the same shared
//! scope, while each keeps a private tab scope. Shared writes are
//! published on a broadcast feed tagged with the writing context, which
//! is how other contexts observe cross-tab changes.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use eventhub_core::result::AppResult;
use eventhub_core::traits::storage::{KeyValueStore, SharedWatch, StoreChange, StoreScope};

/// Capacity of the shared change feed. Consumers that lag past this many
/// events skip ahead and re-read current state, so a small buffer is fine.
const CHANGE_FEED_CAPACITY: usize = 64;

/// The shared scope: one per origin, common to every tab context.
#[derive(Debug)]
pub struct SharedDirectory {
    values: DashMap<String, String>,
    changes: broadcast::Sender<StoreChange>,
}

impl SharedDirectory {
    /// Create an empty shared directory.
    pub fn new() -> Arc<Self> {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Arc::new(Self {
            values: DashMap::new(),
            changes,
        })
    }
}

/// In-memory storage provider for a single tab context.
#[derive(Debug)]
pub struct MemoryStore {
    /// Identifies this context on the shared change feed.
    context_id: Uuid,
    /// Tab-scoped values, private to this context.
    tab: DashMap<String, String>,
    /// The shared scope, common to all contexts of the same directory.
    shared: Arc<SharedDirectory>,
}

impl MemoryStore {
    /// Create a store for a new tab context over the given shared scope.
    pub fn new(shared: Arc<SharedDirectory>) -> Self {
        Self {
            context_id: Uuid::new_v4(),
            tab: DashMap::new(),
            shared,
        }
    }

    /// The id this context writes onto the shared change feed.
    pub fn context_id(&self) -> Uuid {
        self.context_id
    }

    fn publish_change(&self, key: &str) {
        // Send only fails when no subscriber exists, which is fine.
        let _ = self.shared.changes.send(StoreChange {
            key: key.to_string(),
            origin: self.context_id,
        });
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, scope: StoreScope, key: &str) -> AppResult<Option<String>> {
        let value = match scope {
            StoreScope::Tab => self.tab.get(key).map(|v| v.clone()),
            StoreScope::Shared => self.shared.values.get(key).map(|v| v.clone()),
        };
        Ok(value)
    }

    async fn set(&self, scope: StoreScope, key: &str, value: &str) -> AppResult<()> {
        match scope {
            StoreScope::Tab => {
                self.tab.insert(key.to_string(), value.to_string());
            }
            StoreScope::Shared => {
                self.shared
                    .values
                    .insert(key.to_string(), value.to_string());
                self.publish_change(key);
            }
        }
        Ok(())
    }

    async fn remove(&self, scope: StoreScope, key: &str) -> AppResult<()> {
        match scope {
            StoreScope::Tab => {
                self.tab.remove(key);
            }
            StoreScope::Shared => {
                let removed = self.shared.values.remove(key).is_some();
                if removed {
                    self.publish_change(key);
                } else {
                    debug!(key, "Shared remove of absent key");
                }
            }
        }
        Ok(())
    }

    fn subscribe(&self) -> Option<SharedWatch> {
        Some(SharedWatch::new(
            self.shared.changes.subscribe(),
            self.context_id,
        ))
    }

    fn shared_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_tab_scope_is_private_per_context() {
        let shared = SharedDirectory::new();
        let tab_a = MemoryStore::new(Arc::clone(&shared));
        let tab_b = MemoryStore::new(Arc::clone(&shared));

        tab_a.set(StoreScope::Tab, "sessionId", "a-1").await.unwrap();

        assert_eq!(
            tab_a.get(StoreScope::Tab, "sessionId").await.unwrap(),
            Some("a-1".to_string())
        );
        assert_eq!(tab_b.get(StoreScope::Tab, "sessionId").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_shared_scope_is_visible_across_contexts() {
        let shared = SharedDirectory::new();
        let tab_a = MemoryStore::new(Arc::clone(&shared));
        let tab_b = MemoryStore::new(Arc::clone(&shared));

        tab_a
            .set(StoreScope::Shared, "activeSessions", "{}")
            .await
            .unwrap();

        assert_eq!(
            tab_b
                .get(StoreScope::Shared, "activeSessions")
                .await
                .unwrap(),
            Some("{}".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_clears_key() {
        let shared = SharedDirectory::new();
        let store = MemoryStore::new(shared);

        store.set(StoreScope::Tab, "userRole", "admin").await.unwrap();
        store.remove(StoreScope::Tab, "userRole").await.unwrap();
        assert_eq!(store.get(StoreScope::Tab, "userRole").await.unwrap(), None);

        // Removing again is not an error.
        store.remove(StoreScope::Tab, "userRole").await.unwrap();
    }

    #[tokio::test]
    async fn test_subscriber_sees_other_contexts_writes_only() {
        let shared = SharedDirectory::new();
        let tab_a = MemoryStore::new(Arc::clone(&shared));
        let tab_b = MemoryStore::new(Arc::clone(&shared));

        let mut watch_a = tab_a.subscribe().unwrap();
        let mut watch_b = tab_b.subscribe().unwrap();

        tab_a
            .set(StoreScope::Shared, "activeSessions", "{}")
            .await
            .unwrap();

        // The other context observes the change.
        let change = watch_b.changed().await.unwrap();
        assert_eq!(change.key, "activeSessions");
        assert_eq!(change.origin, tab_a.context_id());

        // The writer itself is never notified of its own write.
        let own = tokio::time::timeout(Duration::from_millis(50), watch_a.changed()).await;
        assert!(own.is_err());
    }

    #[tokio::test]
    async fn test_tab_writes_do_not_hit_the_change_feed() {
        let shared = SharedDirectory::new();
        let tab_a = MemoryStore::new(Arc::clone(&shared));
        let tab_b = MemoryStore::new(Arc::clone(&shared));

        let mut watch_b = tab_b.subscribe().unwrap();
        tab_a.set(StoreScope::Tab, "userEmail", "a@x.test").await.unwrap();

        let seen = tokio::time::timeout(Duration::from_millis(50), watch_b.changed()).await;
        assert!(seen.is_err());
    }
}
