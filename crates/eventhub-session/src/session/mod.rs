//! Session lifecycle: the per-tab session, the shared registry, and the
//! monitor that keeps them reconciled.

pub mod monitor;
pub mod registry;
pub mod tab;

pub use monitor::{MonitorHandle, MonitorState, SessionMonitor};
pub use registry::SessionRegistry;
pub use tab::TabSession;
