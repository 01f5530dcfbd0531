use std::sync::Arc;

use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::storage::KeyValueStore;
use crate::users::repo_types::UserRecord;

/// Store key holding the JSON array of user records.
pub const USERS_KEY: &str = "marketing_users";
/// Presence of this key marks that first-run seeding already happened.
pub const DEMO_INIT_KEY: &str = "marketing_demo_initialized";

/// Reads and writes the full user sequence through the storage port.
#[derive(Clone)]
pub struct UserRepo {
    store: Arc<dyn KeyValueStore>,
}

impl UserRepo {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the whole sequence. Fails soft: an unreadable or malformed
    /// value yields an empty sequence with a warning only.
    pub async fn load(&self) -> Vec<UserRecord> {
        let raw = match self.store.get(USERS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "user store unreadable, returning no users");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "user sequence corrupted, returning no users");
                Vec::new()
            }
        }
    }

    /// Overwrites the whole sequence. A rejected write is a real error.
    pub async fn save(&self, users: &[UserRecord]) -> AppResult<()> {
        let json = serde_json::to_string(users)
            .map_err(|e| AppError::Storage(anyhow::Error::new(e)))?;
        self.store
            .set(USERS_KEY, &json)
            .await
            .map_err(AppError::Storage)
    }

    pub async fn is_seeded(&self) -> bool {
        matches!(self.store.get(DEMO_INIT_KEY).await, Ok(Some(_)))
    }

    pub async fn mark_seeded(&self) -> AppResult<()> {
        self.store
            .set(DEMO_INIT_KEY, "1")
            .await
            .map_err(AppError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn repo() -> (UserRepo, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (UserRepo::new(store.clone()), store)
    }

    #[tokio::test]
    async fn load_of_absent_key_is_empty() {
        let (repo, _) = repo();
        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let (repo, _) = repo();
        let users = vec![UserRecord::new("a@b.com", "pw")];
        repo.save(&users).await.unwrap();

        let loaded = repo.load().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].email, "a@b.com");
    }

    #[tokio::test]
    async fn corrupt_sequence_loads_as_empty() {
        let (repo, store) = repo();
        store.set(USERS_KEY, "{not an array").await.unwrap();
        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn seeded_flag_roundtrips() {
        let (repo, _) = repo();
        assert!(!repo.is_seeded().await);
        repo.mark_seeded().await.unwrap();
        assert!(repo.is_seeded().await);
    }
}
