//! # eventhub-storage
//!
//! Key-value storage providers for Campus EventHub. Two providers exist:
//!
//! - **memory**: per-tab maps plus a shared directory with a change feed,
//!   backed by [dashmap](https://crates.io/crates/dashmap)
//! - **disabled**: models unavailable storage; reads are empty, writes are
//!   accepted and dropped
//!
//! The provider is selected at runtime based on configuration.

pub mod disabled;
pub mod keys;
pub mod memory;
pub mod provider;

pub use disabled::DisabledStore;
pub use memory::{MemoryStore, SharedDirectory};
pub use provider::StoreManager;
