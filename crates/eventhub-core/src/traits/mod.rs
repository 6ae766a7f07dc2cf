//! Traits implemented by the pluggable EventHub backends.

pub mod storage;

pub use storage::{KeyValueStore, SharedWatch, StoreChange, StoreScope};
