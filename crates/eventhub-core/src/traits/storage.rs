//! Key-value storage trait for pluggable tab/shared scoped backends.
//!
//! Models the two browser storage scopes as an explicit interface so that
//! business logic never touches an ambient global, and so tests can swap
//! in fakes. The shared scope additionally carries a change feed: every
//! write made by one context is observable by every *other* context.

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::result::AppResult;

/// The two storage scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// Visible only to the owning context, cleared when it is destroyed.
    Tab,
    /// Visible to every context of the same origin, outlives any one tab.
    Shared,
}

/// A change to a shared-scope value, tagged with the context that wrote it.
#[derive(Debug, Clone)]
pub struct StoreChange {
    /// The shared key that changed.
    pub key: String,
    /// The context that performed the write.
    pub origin: Uuid,
}

/// Subscription to shared-scope changes made by *other* contexts.
///
/// Changes originated by the owning context are filtered out, matching the
/// browser `storage` event contract: a context is never notified of its
/// own writes.
#[derive(Debug)]
pub struct SharedWatch {
    receiver: broadcast::Receiver<StoreChange>,
    own_context: Uuid,
}

impl SharedWatch {
    /// Wrap a broadcast receiver, filtering events from `own_context`.
    pub fn new(receiver: broadcast::Receiver<StoreChange>, own_context: Uuid) -> Self {
        Self {
            receiver,
            own_context,
        }
    }

    /// Wait for the next change made by another context.
    ///
    /// Returns `None` once the feed is closed. A lagged receiver skips to
    /// the most recent events rather than failing; a missed intermediate
    /// change is harmless because consumers re-read current state anyway.
    pub async fn changed(&mut self) -> Option<StoreChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.origin == self.own_context => continue,
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Trait for scoped key-value storage backends.
///
/// Implementations must degrade rather than fail: when the underlying
/// storage is unavailable, reads resolve to `Ok(None)` and writes are
/// accepted as no-ops. Callers are responsible for behaving sensibly on
/// empty reads.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, scope: StoreScope, key: &str) -> AppResult<Option<String>>;

    /// Set a value.
    async fn set(&self, scope: StoreScope, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, scope: StoreScope, key: &str) -> AppResult<()>;

    /// Subscribe to shared-scope changes made by other contexts.
    ///
    /// Returns `None` when the shared scope is unavailable; callers then
    /// fall back to purely local (TTL-based) invalidation.
    fn subscribe(&self) -> Option<SharedWatch>;

    /// Whether the shared scope is usable at all.
    fn shared_available(&self) -> bool;
}
