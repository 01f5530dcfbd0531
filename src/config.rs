use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// File backing the key-value store.
    pub storage_path: PathBuf,
    /// Artificial latency on the login path, simulating a network round trip.
    pub login_delay_ms: u64,
    /// Active display language for the content cache.
    pub language: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            storage_path: std::env::var("MARKETHUB_STORAGE_PATH")
                .unwrap_or_else(|_| "data/markethub-store.json".into())
                .into(),
            login_delay_ms: std::env::var("MARKETHUB_LOGIN_DELAY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(400),
            language: std::env::var("MARKETHUB_LANG").unwrap_or_else(|_| "en".into()),
        })
    }
}
