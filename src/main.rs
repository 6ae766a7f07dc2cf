//! Campus EventHub — client-side session coordinator CLI.
//!
//! `eventhub login` signs into the configured event backend and holds the
//! session under the monitor; `eventhub walkthrough` simulates two tab
//! contexts over one shared directory to demonstrate cross-tab logout.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use eventhub_core::config::AppConfig;
use eventhub_core::error::AppError;
use eventhub_core::types::{IdentityPayload, Role};
use eventhub_session::{AuthClient, GateDecision, RoleGate, SessionMonitor, TabSession};
use eventhub_storage::{SharedDirectory, StoreManager};

#[derive(Parser)]
#[command(name = "eventhub", version, about = "Campus EventHub session coordinator")]
struct Cli {
    /// Configuration environment (selects config/<env>.toml overlay).
    #[arg(long, default_value = "development", global = true)]
    env: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log into the event backend and hold the session until Ctrl+C.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password; prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Simulate two tab contexts sharing one session directory.
    Walkthrough,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let result = match cli.command {
        Command::Login { email, password } => login(&config, &email, password).await,
        Command::Walkthrough => walkthrough(&config).await,
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Initialize tracing from the logging section, letting `RUST_LOG`
/// override the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Authenticate against the backend, seed a tab session, and watch it
/// until the monitor invalidates it or the user interrupts.
async fn login(config: &AppConfig, email: &str, password: Option<String>) -> Result<(), AppError> {
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Failed to read password: {e}")))?,
    };

    let client = AuthClient::new(&config.backend)?;
    let user = client.login(email, &password).await?;

    let shared = SharedDirectory::new();
    let store = StoreManager::new(&config.store, shared)?;
    let tab = TabSession::new(Arc::new(store), config.session.clone());
    let role = tab.authenticate(&user).await?;

    let gate = RoleGate::new(config.routes.clone());
    tracing::info!(
        email,
        role = %role,
        landing = %gate.landing_for(Some(role)),
        "Logged in"
    );

    let mut monitor = SessionMonitor::new(tab.clone(), &config.session).spawn().await;

    tokio::select! {
        _ = monitor.invalidated() => {
            tracing::info!(redirect = %config.routes.login, "Session no longer valid");
        }
        _ = shutdown_signal() => {
            tracing::info!("Interrupt received, logging out");
            tab.destroy().await?;
        }
    }

    Ok(())
}

/// Two tab contexts over one shared directory: a coordinator in tab A, an
/// admin in tab B, then a logout-everywhere from B that tab A's monitor
/// picks up.
async fn walkthrough(config: &AppConfig) -> Result<(), AppError> {
    let shared = SharedDirectory::new();
    let open_tab = |label: &'static str| -> Result<TabSession, AppError> {
        let store = StoreManager::new(&config.store, Arc::clone(&shared))?;
        tracing::info!(tab = label, "Opening tab context");
        Ok(TabSession::new(Arc::new(store), config.session.clone()))
    };

    let tab_a = open_tab("A")?;
    let tab_b = open_tab("B")?;

    let role_a = tab_a
        .authenticate(&demo_identity("u-100", "coordinator", "coordinator@campus.test"))
        .await?;
    let role_b = tab_b
        .authenticate(&demo_identity("u-200", "admin", "admin@campus.test"))
        .await?;

    let registry = tab_a.registry().snapshot().await;
    tracing::info!(
        active_sessions = registry.len(),
        "Both tabs registered in the shared directory"
    );
    for (session_id, summary) in &registry {
        tracing::info!(%session_id, role = %summary.role, email = %summary.email, "Active session");
    }

    let gate = RoleGate::new(config.routes.clone());
    for (label, tab, role) in [("A", &tab_a, role_a), ("B", &tab_b, role_b)] {
        let snapshot = tab.snapshot().await;
        match gate.decide(&snapshot, &[Role::Admin]) {
            GateDecision::Allow => {
                tracing::info!(tab = label, %role, "Admin dashboard: allowed");
            }
            GateDecision::DenyRedirect { target } => {
                tracing::info!(tab = label, %role, %target, "Admin dashboard: redirected");
            }
        }
    }

    let mut monitor_a = SessionMonitor::new(tab_a.clone(), &config.session).spawn().await;

    tracing::info!("Tab B logs out everywhere");
    tab_b.destroy_all().await?;

    tokio::time::timeout(Duration::from_secs(5), monitor_a.invalidated())
        .await
        .map_err(|_| AppError::internal("Tab A did not observe the logout"))?;
    tracing::info!(
        authenticated = tab_a.is_authenticated().await,
        "Tab A invalidated by the remote logout"
    );

    Ok(())
}

fn demo_identity(id: &str, role: &str, email: &str) -> IdentityPayload {
    IdentityPayload {
        id: id.to_string(),
        email: email.to_string(),
        full_name: format!("Demo {role}"),
        role: role.to_string(),
        mobile: None,
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
