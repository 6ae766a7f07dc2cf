//! Route-guard authorization decisions.

pub mod decision;

pub use decision::{GateDecision, RoleGate};
