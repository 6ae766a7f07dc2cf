//! End-to-end multi-tab coordination: independent tab contexts over one
//! shared directory, with monitors reacting to remote logout.

use std::sync::Arc;
use std::time::Duration;

use eventhub_core::config::session::SessionConfig;
use eventhub_core::types::{IdentityPayload, Role};
use eventhub_session::{MonitorState, RoleGate, SessionMonitor, TabSession};
use eventhub_session::GateDecision;
use eventhub_storage::{MemoryStore, SharedDirectory};

fn payload(id: &str, role: &str, email: &str) -> IdentityPayload {
    IdentityPayload {
        id: id.to_string(),
        email: email.to_string(),
        full_name: format!("User {id}"),
        role: role.to_string(),
        mobile: None,
    }
}

fn open_tab(shared: &Arc<SharedDirectory>) -> TabSession {
    TabSession::new(
        Arc::new(MemoryStore::new(Arc::clone(shared))),
        SessionConfig::default(),
    )
}

#[tokio::test]
async fn test_logout_everywhere_invalidates_every_other_tab() {
    let shared = SharedDirectory::new();

    // Tab A logs in as a coordinator.
    let tab_a = open_tab(&shared);
    let role = tab_a
        .authenticate(&payload("u1", "coordinator", "c1@x.test"))
        .await
        .unwrap();
    assert_eq!(role, Role::Coordinator);

    let registry = tab_a.registry().snapshot().await;
    assert_eq!(registry.len(), 1);
    assert!(registry.values().all(|s| s.role == Role::Coordinator));

    let mut monitor_a = SessionMonitor::new(tab_a.clone(), &SessionConfig::default())
        .spawn()
        .await;

    // Tab B opens and logs in as an admin.
    let tab_b = open_tab(&shared);
    tab_b
        .authenticate(&payload("u2", "admin", "a1@x.test"))
        .await
        .unwrap();
    assert_eq!(tab_a.registry().snapshot().await.len(), 2);

    // B's own registry write must not disturb A.
    tokio::task::yield_now().await;
    assert_eq!(monitor_a.state(), MonitorState::Active);

    // Tab B logs out everywhere.
    tab_b.destroy_all().await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), monitor_a.invalidated())
        .await
        .expect("tab A must invalidate after a remote logout-everywhere");

    assert!(!tab_a.is_authenticated().await);
    assert!(tab_a.registry().snapshot().await.is_empty());
}

#[tokio::test]
async fn test_tabs_hold_independent_sessions() {
    let shared = SharedDirectory::new();

    let tab_a = open_tab(&shared);
    let tab_b = open_tab(&shared);
    tab_a
        .authenticate(&payload("u1", "coordinator", "c1@x.test"))
        .await
        .unwrap();
    tab_b
        .authenticate(&payload("u2", "admin", "a1@x.test"))
        .await
        .unwrap();

    let sid_a = tab_a.current_session_id().await.unwrap();
    let sid_b = tab_b.current_session_id().await.unwrap();
    assert_ne!(sid_a, sid_b);

    let registry = tab_a.registry().snapshot().await;
    assert_eq!(registry.len(), 2);
    assert_eq!(registry[&sid_a].email, "c1@x.test");
    assert_eq!(registry[&sid_b].email, "a1@x.test");

    // Destroying one session leaves the other authenticated.
    tab_a.destroy().await.unwrap();
    assert!(!tab_a.is_authenticated().await);
    assert!(tab_b.is_authenticated().await);
    assert_eq!(tab_b.registry().snapshot().await.len(), 1);
}

#[tokio::test]
async fn test_snapshot_feeds_the_role_gate() {
    let shared = SharedDirectory::new();
    let gate = RoleGate::default();

    let tab = open_tab(&shared);

    // Anonymous tab: every protected view redirects to login.
    let decision = gate.decide(&tab.snapshot().await, &[]);
    assert_eq!(
        decision,
        GateDecision::DenyRedirect {
            target: "/login".to_string()
        }
    );

    // A coordinator passes a coordinator gate but not the admin one.
    tab.authenticate(&payload("u1", "coordinator", "c1@x.test"))
        .await
        .unwrap();
    let snapshot = tab.snapshot().await;
    assert_eq!(
        gate.decide(&snapshot, &[Role::Coordinator, Role::Admin]),
        GateDecision::Allow
    );
    assert_eq!(
        gate.decide(&snapshot, &[Role::Admin]),
        GateDecision::DenyRedirect {
            target: "/home".to_string()
        }
    );
}
