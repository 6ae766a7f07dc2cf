//! # eventhub-core
//!
//! Core crate for Campus EventHub. Contains the key-value storage trait,
//! configuration schemas, domain types (roles and identities), and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other EventHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
