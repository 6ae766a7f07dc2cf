//! Background watcher reconciling a tab's session against the shared
//! registry and its own TTL.

use std::sync::Arc;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use eventhub_core::config::session::SessionConfig;
use eventhub_core::traits::storage::{SharedWatch, StoreChange};
use eventhub_storage::keys;

use super::tab::TabSession;

/// The monitor's two states. `Invalidated` is terminal: a fresh login
/// constructs a fresh monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// The tab holds a valid session.
    Active,
    /// The session was torn down, locally or by another tab.
    Invalidated,
}

/// What woke the monitor up.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// Another context rewrote the shared registry.
    RegistryChange,
    /// The periodic liveness tick.
    LivenessTick,
    /// The tab returned to the foreground after being hidden.
    VisibilityResume,
}

/// Watches one tab's session.
///
/// Three triggers funnel into the same idempotent reconciliation: a
/// shared-store change notification, a periodic liveness tick, and an
/// explicit visibility-resume signal (ticks may have been throttled while
/// the tab was backgrounded). Whichever fires first on a dead session
/// wins; the others observe the already-destroyed state and do nothing.
#[derive(Debug)]
pub struct SessionMonitor {
    tab: TabSession,
    interval: std::time::Duration,
}

impl SessionMonitor {
    /// Create a monitor for the given tab session.
    pub fn new(tab: TabSession, config: &SessionConfig) -> Self {
        Self {
            tab,
            interval: config.liveness_interval(),
        }
    }

    /// Start watching in a background task.
    ///
    /// The tab's validity is checked before the task is spawned, so the
    /// returned handle never reports `Active` for a tab that held no
    /// valid session at construction time.
    pub async fn spawn(self) -> MonitorHandle {
        let visibility = Arc::new(Notify::new());

        if !self.tab.is_authenticated().await {
            info!("No valid session at monitor start");
            let (_, state_rx) = watch::channel(MonitorState::Invalidated);
            return MonitorHandle {
                state: state_rx,
                visibility,
                task: tokio::spawn(async {}),
            };
        }

        let (state_tx, state_rx) = watch::channel(MonitorState::Active);

        // Subscribe before the task is scheduled so no change published
        // between spawn and the first poll is missed.
        let shared_watch = self.tab.store().subscribe();
        if shared_watch.is_none() {
            info!("Shared storage unavailable; cross-tab awareness disabled");
        }

        let task = tokio::spawn(self.run(shared_watch, state_tx, Arc::clone(&visibility)));
        MonitorHandle {
            state: state_rx,
            visibility,
            task,
        }
    }

    async fn run(
        self,
        mut shared_watch: Option<SharedWatch>,
        state: watch::Sender<MonitorState>,
        visibility: Arc<Notify>,
    ) {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick fires immediately, re-checking right
        // after the pre-spawn validity check.

        loop {
            let trigger = tokio::select! {
                _ = tick.tick() => Trigger::LivenessTick,
                _ = visibility.notified() => Trigger::VisibilityResume,
                change = next_change(&mut shared_watch) => match change {
                    Some(StoreChange { key, .. }) if key == keys::ACTIVE_SESSIONS => {
                        Trigger::RegistryChange
                    }
                    Some(_) => continue,
                    None => {
                        // Feed closed; fall back to tick-only operation.
                        shared_watch = None;
                        continue;
                    }
                },
            };

            if !self.reconcile(trigger).await {
                break;
            }
        }

        if let Err(e) = self.tab.destroy().await {
            warn!(error = %e, "Failed to destroy tab session during invalidation");
        }
        let _ = state.send(MonitorState::Invalidated);
        info!("Session invalidated");
    }

    /// Re-check the session. Returns whether it is still valid.
    ///
    /// Idempotent and free of side effects on a valid session; on an
    /// invalid one the only effect is the (idempotent) teardown inside
    /// [`TabSession::is_authenticated`], so any trigger may re-run it.
    async fn reconcile(&self, trigger: Trigger) -> bool {
        if !self.tab.is_authenticated().await {
            return false;
        }

        if matches!(trigger, Trigger::RegistryChange) {
            if let Some(session_id) = self.tab.current_session_id().await {
                if !self.tab.registry().contains(&session_id).await {
                    info!(
                        session_id = %session_id,
                        "Session removed from registry by another tab"
                    );
                    return false;
                }
            }
        }

        true
    }
}

async fn next_change(shared_watch: &mut Option<SharedWatch>) -> Option<StoreChange> {
    match shared_watch {
        Some(watch) => watch.changed().await,
        None => std::future::pending().await,
    }
}

/// Handle to a running monitor.
///
/// Dropping the handle aborts the background task, tearing down the tick
/// timer and the shared-store subscription with it.
#[derive(Debug)]
pub struct MonitorHandle {
    state: watch::Receiver<MonitorState>,
    visibility: Arc<Notify>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// The monitor's current state.
    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    /// Signal that the tab regained foreground visibility. The monitor
    /// immediately re-runs the liveness check.
    pub fn notify_visible(&self) {
        self.visibility.notify_one();
    }

    /// Wait until the session is invalidated. The UI layer uses this to
    /// redirect to the unauthenticated entry point.
    pub async fn invalidated(&mut self) {
        while *self.state.borrow() != MonitorState::Invalidated {
            if self.state.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
