use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use tracing::warn;

/// Storage port standing in for browser local storage: string-keyed
/// get/set/remove, injected wherever persistence is needed so tests can
/// supply an in-memory fake.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// File-backed store: a single JSON object of key -> value in one file.
///
/// Every operation is a full read-modify-write of that file. There is no
/// transactional guarantee; two processes sharing the file can clobber each
/// other, matching the accepted multi-tab race of the original store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A malformed or unreadable file is treated as empty.
    fn load(&self) -> HashMap<String, String> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store unreadable, treating as empty");
                return HashMap::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store corrupted, treating as empty");
                HashMap::new()
            }
        }
    }

    fn persist(&self, map: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if parent != Path::new("") {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create store directory {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(map).context("serialize store")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write store file {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.load().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());
        self.persist(&map)
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut map = self.load();
        if map.remove(key).is_some() {
            self.persist(&map)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and the fake app state.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let map = self
            .map
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_roundtrip_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::new(&path);
        store.set("users", "[]").await.unwrap();
        store.set("session", "{}").await.unwrap();
        store.remove("session").await.unwrap();

        // A second store over the same file sees the surviving key.
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("users").await.unwrap(), Some("[]".to_string()));
        assert_eq!(reopened.get("session").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_corrupt_file_reads_as_empty_and_stays_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get("k").await.unwrap(), None);

        // The next write replaces the corrupt contents with a valid store.
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/store.json");
        let store = JsonFileStore::new(&path);
        store.set("k", "v").await.unwrap();
        assert!(path.exists());
    }
}
