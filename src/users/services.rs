use std::fmt::Write as _;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::seed::SeedData;
use crate::storage::KeyValueStore;
use crate::users::dto::UserStats;
use crate::users::repo::UserRepo;
use crate::users::repo_types::UserRecord;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub const MSG_UNKNOWN_EMAIL: &str = "no account matches that email";
pub const MSG_WRONG_PASSWORD: &str = "wrong password for that account";

/// Credential Store: owns the durable sequence of user records.
///
/// Every operation is a synchronous read-modify-write of the entire stored
/// sequence; there is exactly one logical actor, so no locking.
#[derive(Clone)]
pub struct CredentialService {
    repo: UserRepo,
    seed: Arc<SeedData>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn KeyValueStore>, seed: Arc<SeedData>) -> Self {
        Self {
            repo: UserRepo::new(store),
            seed,
        }
    }

    fn seed_records(&self) -> Vec<UserRecord> {
        self.seed
            .default_users
            .iter()
            .map(|u| UserRecord::new(u.email.clone(), u.password.clone()))
            .collect()
    }

    /// Seeds the store with the fixed default records on first run.
    /// Idempotent: safe to call on every startup.
    pub async fn initialize(&self) -> AppResult<()> {
        if !self.repo.load().await.is_empty() {
            // Records already present; never reseed over them.
            if !self.repo.is_seeded().await {
                self.repo.mark_seeded().await?;
            }
            return Ok(());
        }
        let records = self.seed_records();
        self.repo.save(&records).await?;
        self.repo.mark_seeded().await?;
        info!(count = records.len(), "seeded default user records");
        Ok(())
    }

    pub async fn list_all(&self) -> Vec<UserRecord> {
        self.repo.load().await
    }

    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.repo
            .load()
            .await
            .into_iter()
            .find(|u| u.matches_email(email))
    }

    /// Two-stage check: unknown email and wrong password fail with
    /// distinguishable messages (acceptable for a demo, a real system must
    /// not leak which stage failed). Success stamps `last_login_at`.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<UserRecord> {
        let mut users = self.repo.load().await;
        let Some(idx) = users.iter().position(|u| u.matches_email(email)) else {
            warn!(email, "credential check against unknown email");
            return Err(AppError::Auth(MSG_UNKNOWN_EMAIL.to_string()));
        };
        // Passwords compare exact and case-sensitive.
        if users[idx].password != password {
            warn!(email, "credential check with wrong password");
            return Err(AppError::Auth(MSG_WRONG_PASSWORD.to_string()));
        }

        users[idx].last_login_at = Some(OffsetDateTime::now_utc());
        self.repo.save(&users).await?;
        let user = users.swap_remove(idx);
        info!(user_id = %user.id, email = %user.email, "credentials validated");
        Ok(user)
    }

    /// Appends a new record unless the email is already taken
    /// (case-insensitive).
    pub async fn register(&self, email: &str, password: &str) -> AppResult<UserRecord> {
        let email = email.trim().to_lowercase();

        if !is_valid_email(&email) {
            warn!(email = %email, "registration with invalid email");
            return Err(AppError::validation("email", "invalid email address"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password", "password must not be empty"));
        }

        let mut users = self.repo.load().await;
        if users.iter().any(|u| u.matches_email(&email)) {
            warn!(email = %email, "registration against existing email");
            return Err(AppError::Duplicate(email));
        }

        let user = UserRecord::new(email, password);
        users.push(user.clone());
        self.repo.save(&users).await?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn stats(&self) -> UserStats {
        let users = self.repo.load().await;
        let default_users = users
            .iter()
            .filter(|u| self.seed.is_default_email(&u.email))
            .count();
        UserStats {
            total_users: users.len(),
            default_users,
            registered_users: users.len() - default_users,
        }
    }

    /// Overwrites the entire stored sequence with exactly the fixed seed
    /// set. Destructive.
    pub async fn reset_to_default(&self) -> AppResult<()> {
        let records = self.seed_records();
        self.repo.save(&records).await?;
        self.repo.mark_seeded().await?;
        info!(count = records.len(), "user store reset to seed set");
        Ok(())
    }

    /// Serializes the full sequence to a human-readable text form.
    pub async fn export_all(&self) -> String {
        let users = self.repo.load().await;
        let mut out = format!("markethub user export ({} users)\n", users.len());
        for u in &users {
            let created = u
                .created_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| "unknown".to_string());
            let last_login = u
                .last_login_at
                .and_then(|t| t.format(&Rfc3339).ok())
                .unwrap_or_else(|| "never".to_string());
            let _ = writeln!(
                out,
                "{}\t{}\t{}\tcreated={}\tlast_login={}",
                u.id, u.email, u.password, created, last_login
            );
        }
        out
    }

    /// Administrative removal of a single record by email. Returns whether
    /// anything was deleted.
    pub async fn remove_by_email(&self, email: &str) -> AppResult<bool> {
        let mut users = self.repo.load().await;
        let before = users.len();
        users.retain(|u| !u.matches_email(email));
        if users.len() == before {
            return Ok(false);
        }
        self.repo.save(&users).await?;
        info!(email, "user record removed");
        Ok(true)
    }
}
