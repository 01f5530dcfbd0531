use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::seed::SeedData;
use crate::session::context::SessionContext;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::users::services::CredentialService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn KeyValueStore>,
    pub seed: Arc<SeedData>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store =
            Arc::new(JsonFileStore::new(&config.storage_path)) as Arc<dyn KeyValueStore>;
        Ok(Self {
            config,
            store,
            seed: Arc::new(SeedData::default()),
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KeyValueStore>,
        seed: Arc<SeedData>,
    ) -> Self {
        Self { config, store, seed }
    }

    pub fn credential_service(&self) -> CredentialService {
        CredentialService::new(self.store.clone(), self.seed.clone())
    }

    pub fn session_context(&self) -> SessionContext {
        SessionContext::new(
            self.store.clone(),
            self.credential_service(),
            self.seed.clone(),
            Duration::from_millis(self.config.login_delay_ms),
        )
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            storage_path: "unused".into(),
            login_delay_ms: 0,
            language: "en".into(),
        });
        let store = Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>;
        Self {
            config,
            store,
            seed: Arc::new(SeedData::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_state_wires_working_services() {
        let state = AppState::fake();
        let users = state.credential_service();
        users.initialize().await.unwrap();

        let session = state.session_context();
        let outcome = session.login("demo", "demo123").await.unwrap();
        assert_eq!(outcome.identity.username, "demo");
    }
}
