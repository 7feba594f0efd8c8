//! Caching layer for lexguard-runtime.
//!
//! Validation is deterministic, so identical `(knowledge version, query,
//! response)` triples can reuse an earlier result. A cached result keeps
//! the `validated_at` of its first computation.
//!
//! Keys hold the full query and response text, so a hit always belongs to
//! the exact pair being validated.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use lexguard_core::ValidationResult;

/// Cache key for validation results.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    knowledge_version: Arc<str>,
    query: Arc<str>,
    response: Arc<str>,
}

impl CacheKey {
    pub fn new(knowledge_version: &str, query: &str, response: &str) -> Self {
        Self {
            knowledge_version: Arc::from(knowledge_version),
            query: Arc::from(query),
            response: Arc::from(response),
        }
    }
}

/// Bounded, time-limited cache of validation results.
pub struct ValidationCache {
    cache: Cache<CacheKey, ValidationResult>,
}

impl ValidationCache {
    /// Create a new cache. A capacity of zero stores nothing.
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<ValidationResult> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, result: ValidationResult) {
        self.cache.insert(key, result).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate number of cached results.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply pending inserts and evictions so `entry_count` is current.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for ValidationCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexguard_core::{validate_response, KnowledgeBase};

    #[tokio::test]
    async fn test_cache_operations() {
        let cache = ValidationCache::default();
        let knowledge = KnowledgeBase::builtin().unwrap();
        let query = "Apa sanksi pidana untuk pencurian?";
        let response = "Berdasarkan KUHP Pasal 362, pencurian diancam pidana penjara.";

        let key = CacheKey::new(&knowledge.version, query, response);

        // Cache miss
        assert!(cache.get(&key).await.is_none());

        let result = validate_response(&knowledge, query, response);
        cache.insert(key.clone(), result.clone()).await;

        // Cache hit
        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached, result);

        // Different response, different key
        let other = CacheKey::new(&knowledge.version, query, "Jawaban lain.");
        assert!(cache.get(&other).await.is_none());
    }

    #[tokio::test]
    async fn test_hit_requires_exact_text() {
        let cache = ValidationCache::default();
        let knowledge = KnowledgeBase::builtin().unwrap();
        let key = CacheKey::new(&knowledge.version, "ab", "c");
        cache
            .insert(key.clone(), validate_response(&knowledge, "ab", "c"))
            .await;

        assert_ne!(key, CacheKey::new(&knowledge.version, "a", "bc"));
        assert!(cache.get(&CacheKey::new(&knowledge.version, "a", "bc")).await.is_none());
        assert!(cache.get(&CacheKey::new("other", "ab", "c")).await.is_none());

        let hit = cache.get(&CacheKey::new(&knowledge.version, "ab", "c")).await.unwrap();
        assert_eq!(hit.validated_text, "c");
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = ValidationCache::default();
        let knowledge = KnowledgeBase::builtin().unwrap();
        let key = CacheKey::new(&knowledge.version, "q", "r");
        cache
            .insert(key.clone(), validate_response(&knowledge, "q", "r"))
            .await;

        cache.invalidate_all();
        assert!(cache.get(&key).await.is_none());
    }
}
