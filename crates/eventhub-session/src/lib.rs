//! # eventhub-session
//!
//! The client-side session coordinator for Campus EventHub. Establishes an
//! authenticated identity per tab context, keeps a cross-tab directory of
//! all active identities, detects remote revocation, and enforces TTL
//! expiry and role validity without any server-side session store.
//!
//! ## Modules
//!
//! - `session` — per-tab session, the shared registry, and the background
//!   monitor that reconciles the two
//! - `gate` — pure authorization decisions for route guards
//! - `client` — REST client for the external login/register endpoints

pub mod client;
pub mod gate;
pub mod session;

pub use client::{AuthClient, RegisterRequest};
pub use gate::{GateDecision, RoleGate};
pub use session::{MonitorHandle, MonitorState, SessionMonitor, SessionRegistry, TabSession};
