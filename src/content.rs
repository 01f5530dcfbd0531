use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::storage::KeyValueStore;

/// Prefix for the language-keyed derived-content cache entries.
pub const CONTENT_KEY_PREFIX: &str = "marketing_content_cache.";

/// Cache of derived brand/content pack text, one entry per display
/// language. Rebuilt whenever the active language changes.
pub struct ContentCache {
    store: Arc<dyn KeyValueStore>,
}

impl ContentCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(lang: &str) -> String {
        format!("{CONTENT_KEY_PREFIX}{lang}")
    }

    pub async fn get(&self, lang: &str) -> Option<String> {
        self.store.get(&Self::key(lang)).await.ok().flatten()
    }

    /// Returns the cached text for the language, building and storing it on
    /// a miss.
    pub async fn get_or_build<F>(&self, lang: &str, build: F) -> AppResult<String>
    where
        F: FnOnce() -> String,
    {
        if let Some(cached) = self.get(lang).await {
            debug!(lang, "content cache hit");
            return Ok(cached);
        }
        let text = build();
        self.store
            .set(&Self::key(lang), &text)
            .await
            .map_err(AppError::Storage)?;
        info!(lang, bytes = text.len(), "content pack rebuilt");
        Ok(text)
    }

    /// Drops the cached entries for the given languages, forcing a rebuild
    /// on next access.
    pub async fn invalidate(&self, langs: &[&str]) -> AppResult<()> {
        for lang in langs {
            self.store
                .remove(&Self::key(lang))
                .await
                .map_err(AppError::Storage)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn cache() -> ContentCache {
        ContentCache::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn builds_on_miss_and_reuses_on_hit() {
        let cache = cache();
        let first = cache.get_or_build("en", || "brand pack en".into()).await.unwrap();
        assert_eq!(first, "brand pack en");

        // The builder must not run again on a hit.
        let second = cache
            .get_or_build("en", || unreachable!("cache hit expected"))
            .await
            .unwrap();
        assert_eq!(second, "brand pack en");
    }

    #[tokio::test]
    async fn languages_are_cached_independently() {
        let cache = cache();
        cache.get_or_build("en", || "english".into()).await.unwrap();
        cache.get_or_build("de", || "deutsch".into()).await.unwrap();
        assert_eq!(cache.get("en").await.unwrap(), "english");
        assert_eq!(cache.get("de").await.unwrap(), "deutsch");
    }

    #[tokio::test]
    async fn invalidate_forces_a_rebuild() {
        let cache = cache();
        cache.get_or_build("en", || "old".into()).await.unwrap();
        cache.invalidate(&["en"]).await.unwrap();
        assert!(cache.get("en").await.is_none());

        let rebuilt = cache.get_or_build("en", || "new".into()).await.unwrap();
        assert_eq!(rebuilt, "new");
    }
}
