use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::seed::SeedData;
use crate::session::identity::{IdentityUpdate, Role, SessionIdentity};
use crate::storage::KeyValueStore;
use crate::users::services::CredentialService;

/// Store key holding the serialized identity of the active session.
pub const SESSION_KEY: &str = "marketing_session";

/// Generic login failure. Unlike the credential check, login deliberately
/// does not reveal which stage failed.
pub const MSG_LOGIN_FAILED: &str = "invalid username or password";

/// Successful login: the established identity plus a role-specific welcome
/// message for the notice area.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: SessionIdentity,
    pub message: String,
}

/// Session Context: holds the current authenticated identity (or none) and
/// mirrors it into the store so it survives a restart.
///
/// Explicitly constructed and passed to whoever needs the current identity;
/// there is no ambient global.
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    users: CredentialService,
    seed: Arc<SeedData>,
    current: Mutex<Option<SessionIdentity>>,
    login_delay: Duration,
}

impl SessionContext {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        users: CredentialService,
        seed: Arc<SeedData>,
        login_delay: Duration,
    ) -> Self {
        Self {
            store,
            users,
            seed,
            current: Mutex::new(None),
            login_delay,
        }
    }

    /// Restores the persisted identity, if any. Fails soft: an unreadable
    /// value clears the stored entry and leaves the session unauthenticated.
    pub async fn restore_on_startup(&self) -> Option<SessionIdentity> {
        let raw = match self.store.get(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "session store unreadable, starting unauthenticated");
                return None;
            }
        };
        match serde_json::from_str::<SessionIdentity>(&raw) {
            Ok(identity) => {
                info!(user_id = %identity.id, username = %identity.username, "session restored");
                *self.current.lock().await = Some(identity.clone());
                Some(identity)
            }
            Err(e) => {
                warn!(error = %e, "persisted session corrupted, discarding");
                if let Err(e) = self.store.remove(SESSION_KEY).await {
                    warn!(error = %e, "failed to discard corrupted session value");
                }
                None
            }
        }
    }

    /// Attempts a login: demo accounts from the seed table first, then the
    /// registered records matched on username or email. First match wins.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<LoginOutcome> {
        // Artificial delay simulating network latency.
        tokio::time::sleep(self.login_delay).await;

        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::validation("identifier", "enter a username or email"));
        }

        let demo = self.seed.demo_accounts.iter().find(|a| {
            a.username.eq_ignore_ascii_case(identifier) || a.email.eq_ignore_ascii_case(identifier)
        });
        let identity = match demo {
            Some(account) => {
                if account.password != password {
                    warn!(identifier, "demo login with wrong password");
                    return Err(AppError::Auth(MSG_LOGIN_FAILED.to_string()));
                }
                SessionIdentity {
                    id: account.id.clone(),
                    username: account.username.clone(),
                    email: account.email.clone(),
                    role: account.role,
                    profile_setup_complete: account.profile_setup_complete,
                }
            }
            None => {
                // Registered records carry no username; the identifier is
                // matched against the email and the display name is derived
                // from its local part.
                let user = self
                    .users
                    .validate_credentials(identifier, password)
                    .await
                    .map_err(|e| match e {
                        AppError::Auth(_) => AppError::Auth(MSG_LOGIN_FAILED.to_string()),
                        other => other,
                    })?;
                let username = user
                    .email
                    .split('@')
                    .next()
                    .unwrap_or(user.email.as_str())
                    .to_string();
                SessionIdentity {
                    id: user.id,
                    username,
                    email: user.email,
                    role: Role::User,
                    profile_setup_complete: false,
                }
            }
        };

        self.persist(&identity).await?;
        *self.current.lock().await = Some(identity.clone());
        info!(user_id = %identity.id, role = ?identity.role, "login succeeded");

        let message = match identity.role {
            Role::Admin => format!(
                "Welcome back, {}! You have administrator access.",
                identity.username
            ),
            Role::User => format!("Welcome, {}!", identity.username),
        };
        Ok(LoginOutcome { identity, message })
    }

    /// Clears the in-memory identity and removes the persisted value.
    pub async fn logout(&self) -> AppResult<()> {
        let previous = self.current.lock().await.take();
        if let Some(identity) = previous {
            info!(user_id = %identity.id, "logged out");
        }
        self.store.remove(SESSION_KEY).await.map_err(AppError::Storage)
    }

    /// Merges partial fields into the active identity and re-persists.
    /// No-op when unauthenticated.
    pub async fn update_identity(
        &self,
        update: IdentityUpdate,
    ) -> AppResult<Option<SessionIdentity>> {
        let mut current = self.current.lock().await;
        let Some(identity) = current.as_mut() else {
            return Ok(None);
        };
        if let Some(username) = update.username {
            identity.username = username;
        }
        if let Some(email) = update.email {
            identity.email = email;
        }
        if let Some(done) = update.profile_setup_complete {
            identity.profile_setup_complete = done;
        }
        let updated = identity.clone();
        drop(current);

        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.lock().await.is_some()
    }

    pub async fn current(&self) -> Option<SessionIdentity> {
        self.current.lock().await.clone()
    }

    async fn persist(&self, identity: &SessionIdentity) -> AppResult<()> {
        let json = serde_json::to_string(identity)
            .map_err(|e| AppError::Storage(anyhow::Error::new(e)))?;
        self.store
            .set(SESSION_KEY, &json)
            .await
            .map_err(AppError::Storage)
    }
}
