//! REST client for the external auth endpoints.

pub mod auth;

pub use auth::{AuthClient, RegisterRequest};
