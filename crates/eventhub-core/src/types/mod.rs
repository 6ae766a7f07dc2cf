//! Domain types shared across the EventHub crates.

pub mod identity;
pub mod role;

pub use identity::{Identity, IdentityPayload, IdentitySnapshot, IdentitySummary};
pub use role::Role;
