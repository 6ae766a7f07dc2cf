//! The shared directory of active sessions across all tabs.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use eventhub_core::result::AppResult;
use eventhub_core::traits::storage::{KeyValueStore, StoreScope};
use eventhub_core::types::IdentitySummary;
use eventhub_storage::keys;

/// The registry value: session id → identity summary.
pub type RegistryMap = HashMap<String, IdentitySummary>;

/// Shared directory mapping session ids to identity summaries.
///
/// The whole map is stored as one JSON value under the shared
/// `activeSessions` key. There is no locking: each tab mutates only its
/// own entry, so concurrent writes conflict only when two tabs rewrite
/// the whole map at the same instant. That last-write-wins race is
/// accepted; the registry is a directory for *other* tabs, never the
/// source of truth for a tab's own authentication.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl SessionRegistry {
    /// Create a registry over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Insert or replace the entry for one session.
    pub async fn upsert(&self, summary: IdentitySummary) -> AppResult<()> {
        let mut map = self.read_map().await;
        debug!(session_id = %summary.session_id, role = %summary.role, "Registry upsert");
        map.insert(summary.session_id.clone(), summary);
        self.write_map(&map).await
    }

    /// Remove the entry for one session, if present.
    pub async fn remove(&self, session_id: &str) -> AppResult<()> {
        let mut map = self.read_map().await;
        if map.remove(session_id).is_some() {
            debug!(session_id, "Registry remove");
            self.write_map(&map).await?;
        }
        Ok(())
    }

    /// Empty the registry. Used by "log out everywhere".
    pub async fn clear(&self) -> AppResult<()> {
        debug!("Registry cleared");
        self.store
            .set(StoreScope::Shared, keys::ACTIVE_SESSIONS, "{}")
            .await
    }

    /// Current registry contents. Missing or corrupt data yields an empty
    /// map rather than an error.
    pub async fn snapshot(&self) -> RegistryMap {
        self.read_map().await
    }

    /// Whether the registry currently lists the given session.
    pub async fn contains(&self, session_id: &str) -> bool {
        self.read_map().await.contains_key(session_id)
    }

    async fn read_map(&self) -> RegistryMap {
        let raw = match self.store.get(StoreScope::Shared, keys::ACTIVE_SESSIONS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return RegistryMap::new(),
            Err(e) => {
                warn!(error = %e, "Registry read failed, treating as empty");
                return RegistryMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "Corrupt registry value, treating as empty");
                RegistryMap::new()
            }
        }
    }

    async fn write_map(&self, map: &RegistryMap) -> AppResult<()> {
        let raw = serde_json::to_string(map)?;
        self.store
            .set(StoreScope::Shared, keys::ACTIVE_SESSIONS, &raw)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eventhub_core::types::Role;
    use eventhub_storage::{MemoryStore, SharedDirectory};

    fn summary(session_id: &str, role: Role) -> IdentitySummary {
        IdentitySummary {
            session_id: session_id.to_string(),
            role,
            email: format!("{session_id}@x.test"),
            login_time: Utc::now(),
        }
    }

    fn registry_over(shared: &Arc<SharedDirectory>) -> SessionRegistry {
        SessionRegistry::new(Arc::new(MemoryStore::new(Arc::clone(shared))))
    }

    #[tokio::test]
    async fn test_upsert_remove_roundtrip() {
        let shared = SharedDirectory::new();
        let registry = registry_over(&shared);

        registry.upsert(summary("s1", Role::Coordinator)).await.unwrap();
        registry.upsert(summary("s2", Role::Admin)).await.unwrap();

        let map = registry.snapshot().await;
        assert_eq!(map.len(), 2);
        assert_eq!(map["s1"].role, Role::Coordinator);

        registry.remove("s1").await.unwrap();
        let map = registry.snapshot().await;
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key("s1"));
        assert!(registry.contains("s2").await);
    }

    #[tokio::test]
    async fn test_each_tab_touches_only_its_own_entry() {
        let shared = SharedDirectory::new();
        let registry_a = registry_over(&shared);
        let registry_b = registry_over(&shared);

        registry_a.upsert(summary("a", Role::User)).await.unwrap();
        registry_b.upsert(summary("b", Role::User)).await.unwrap();

        registry_a.remove("a").await.unwrap();

        let map = registry_b.snapshot().await;
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("b"));
    }

    #[tokio::test]
    async fn test_clear_empties_everything() {
        let shared = SharedDirectory::new();
        let registry = registry_over(&shared);

        registry.upsert(summary("s1", Role::User)).await.unwrap();
        registry.clear().await.unwrap();
        assert!(registry.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_value_reads_as_empty() {
        let shared = SharedDirectory::new();
        let store = Arc::new(MemoryStore::new(Arc::clone(&shared)));
        store
            .set(StoreScope::Shared, keys::ACTIVE_SESSIONS, "not json {")
            .await
            .unwrap();

        let registry = SessionRegistry::new(store);
        assert!(registry.snapshot().await.is_empty());

        // An upsert over the corrupt value repairs it.
        registry.upsert(summary("s1", Role::User)).await.unwrap();
        assert_eq!(registry.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_of_absent_entry_is_silent() {
        let shared = SharedDirectory::new();
        let registry = registry_over(&shared);
        registry.remove("ghost").await.unwrap();
        assert!(registry.snapshot().await.is_empty());
    }
}
