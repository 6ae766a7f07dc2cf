//! The current tab's authenticated identity.

use std::sync::Arc;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, warn};

use eventhub_core::config::session::SessionConfig;
use eventhub_core::result::AppResult;
use eventhub_core::traits::storage::{KeyValueStore, StoreScope};
use eventhub_core::types::{Identity, IdentityPayload, IdentitySnapshot, IdentitySummary, Role};
use eventhub_storage::keys;

use super::registry::SessionRegistry;

/// Why a held session stopped being valid.
enum Violation {
    InvalidRole,
    MissingLoginTime,
    Expired,
}

impl Violation {
    fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRole => "invalid role",
            Self::MissingLoginTime => "missing or malformed login time",
            Self::Expired => "ttl exceeded",
        }
    }
}

/// Outcome of checking the three validity invariants.
enum Validity {
    /// All invariants hold.
    Valid,
    /// The tab never established (or already tore down) a session.
    Anonymous,
    /// A session exists but an invariant is broken; it must be destroyed.
    Violated(Violation),
}

/// The per-tab session: owns this tab's identity and publishes a summary
/// of it into the shared registry.
///
/// A tab trusts its own tab-scoped record for its authentication state
/// and the registry only for *other* tabs. Every validity check is
/// fail-closed: a broken invariant tears the session down before the
/// check returns false.
#[derive(Debug, Clone)]
pub struct TabSession {
    store: Arc<dyn KeyValueStore>,
    registry: SessionRegistry,
    config: SessionConfig,
}

impl TabSession {
    /// Create a tab session over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>, config: SessionConfig) -> Self {
        let registry = SessionRegistry::new(Arc::clone(&store));
        Self {
            store,
            registry,
            config,
        }
    }

    /// The shared registry this tab publishes into.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// The underlying store (the monitor subscribes through it).
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// This tab's session id, generated on first use and then cached in
    /// tab scope for the rest of the tab's lifetime.
    pub async fn session_id(&self) -> AppResult<String> {
        if let Some(existing) = self.store.get(StoreScope::Tab, keys::SESSION_ID).await? {
            return Ok(existing);
        }

        let id = generate_session_id();
        self.store
            .set(StoreScope::Tab, keys::SESSION_ID, &id)
            .await?;
        Ok(id)
    }

    /// The cached session id, without generating one.
    pub async fn current_session_id(&self) -> Option<String> {
        self.store
            .get(StoreScope::Tab, keys::SESSION_ID)
            .await
            .ok()
            .flatten()
    }

    /// Establish this tab's identity from a backend login/register payload.
    ///
    /// The raw role string is coerced into the closed [`Role`] set before
    /// anything is persisted; an unknown role becomes [`Role::User`]. The
    /// identity is written to tab scope with `loginTime = now`, the
    /// summary is published into the shared registry, and the stored role
    /// is returned.
    pub async fn authenticate(&self, payload: &IdentityPayload) -> AppResult<Role> {
        let role = match payload.role.parse::<Role>() {
            Ok(role) => role,
            Err(_) => {
                warn!(
                    raw_role = %payload.role,
                    "Unknown role supplied, coercing to least privilege"
                );
                Role::User
            }
        };

        let identity = Identity {
            session_id: self.session_id().await?,
            user_id: payload.id.clone(),
            role,
            email: payload.email.clone(),
            display_name: payload.full_name.clone(),
            login_time: Utc::now(),
        };

        let store = &self.store;
        store
            .set(StoreScope::Tab, keys::IS_AUTHENTICATED, "true")
            .await?;
        store
            .set(StoreScope::Tab, keys::USER_ROLE, identity.role.as_str())
            .await?;
        store
            .set(StoreScope::Tab, keys::USER_EMAIL, &identity.email)
            .await?;
        store
            .set(StoreScope::Tab, keys::USER_ID, &identity.user_id)
            .await?;
        store
            .set(StoreScope::Tab, keys::USER_NAME, &identity.display_name)
            .await?;
        store
            .set(
                StoreScope::Tab,
                keys::LOGIN_TIME,
                &identity.login_time.to_rfc3339(),
            )
            .await?;

        self.registry
            .upsert(IdentitySummary::from(&identity))
            .await?;

        info!(session_id = %identity.session_id, role = %role, "Tab authenticated");
        Ok(role)
    }

    /// Whether this tab currently holds a valid session.
    ///
    /// True only while the authenticated flag is set, the stored role is
    /// one of the closed set, and the session is younger than the TTL.
    /// Any violation destroys the tab session before returning false, so
    /// this never reports "authenticated" optimistically and never leaves
    /// stale identity data behind.
    pub async fn is_authenticated(&self) -> bool {
        match self.validity().await {
            Validity::Valid => true,
            Validity::Anonymous => false,
            Validity::Violated(violation) => {
                warn!(reason = violation.as_str(), "Session invalid, destroying");
                if let Err(e) = self.destroy().await {
                    warn!(error = %e, "Failed to tear down invalid session");
                }
                false
            }
        }
    }

    /// Destroy this tab's session: clear the tab-scoped identity and drop
    /// this tab's entry from the shared registry. Idempotent.
    pub async fn destroy(&self) -> AppResult<()> {
        for key in keys::TAB_IDENTITY_KEYS {
            self.store.remove(StoreScope::Tab, key).await?;
        }

        if let Some(session_id) = self.current_session_id().await {
            self.registry.remove(&session_id).await?;
            info!(session_id = %session_id, "Tab session destroyed");
        }

        Ok(())
    }

    /// Log out of every tab: destroy this session, then empty the shared
    /// registry so every other tab invalidates on its next check.
    pub async fn destroy_all(&self) -> AppResult<()> {
        self.destroy().await?;
        self.registry.clear().await?;
        info!("All sessions destroyed");
        Ok(())
    }

    /// The stored role. Read-only.
    pub async fn role(&self) -> Option<Role> {
        self.read_tab(keys::USER_ROLE)
            .await
            .and_then(|raw| raw.parse().ok())
    }

    /// The stored email. Read-only.
    pub async fn email(&self) -> Option<String> {
        self.read_tab(keys::USER_EMAIL).await
    }

    /// The stored display name. Read-only.
    pub async fn display_name(&self) -> Option<String> {
        self.read_tab(keys::USER_NAME).await
    }

    /// The stored backend user id. Read-only.
    pub async fn user_id(&self) -> Option<String> {
        self.read_tab(keys::USER_ID).await
    }

    /// The full stored identity, when this tab holds a valid session.
    pub async fn identity(&self) -> Option<Identity> {
        if !self.is_authenticated().await {
            return None;
        }
        let login_time = self
            .read_tab(keys::LOGIN_TIME)
            .await
            .and_then(|raw| chrono::DateTime::parse_from_rfc3339(&raw).ok())?
            .with_timezone(&Utc);
        Some(Identity {
            session_id: self.current_session_id().await?,
            user_id: self.user_id().await?,
            role: self.role().await?,
            email: self.email().await?,
            display_name: self.display_name().await.unwrap_or_default(),
            login_time,
        })
    }

    /// A guard-facing view of this tab's authentication state.
    pub async fn snapshot(&self) -> IdentitySnapshot {
        if !self.is_authenticated().await {
            return IdentitySnapshot::anonymous();
        }
        match self.role().await {
            Some(role) => IdentitySnapshot::authenticated(role),
            None => IdentitySnapshot::anonymous(),
        }
    }

    async fn read_tab(&self, key: &str) -> Option<String> {
        self.store.get(StoreScope::Tab, key).await.ok().flatten()
    }

    async fn validity(&self) -> Validity {
        match self.read_tab(keys::IS_AUTHENTICATED).await.as_deref() {
            Some("true") => {}
            _ => return Validity::Anonymous,
        }

        let role_valid = self
            .read_tab(keys::USER_ROLE)
            .await
            .map(|raw| raw.parse::<Role>().is_ok())
            .unwrap_or(false);
        if !role_valid {
            return Validity::Violated(Violation::InvalidRole);
        }

        let login_time = match self.read_tab(keys::LOGIN_TIME).await {
            Some(raw) => match chrono::DateTime::parse_from_rfc3339(&raw) {
                Ok(parsed) => parsed.with_timezone(&Utc),
                Err(_) => return Validity::Violated(Violation::MissingLoginTime),
            },
            None => return Validity::Violated(Violation::MissingLoginTime),
        };

        if Utc::now() - login_time >= self.config.ttl() {
            return Validity::Violated(Violation::Expired);
        }

        Validity::Valid
    }
}

/// Produce a session id unique with overwhelming probability: epoch
/// milliseconds plus a random alphanumeric suffix.
fn generate_session_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix.to_lowercase())
}
