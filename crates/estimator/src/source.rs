//! Where candidate food records come from.
//!
//! [`FoodSource`] abstracts the upstream database so the resolver can run
//! against the live client, a cached wrapper, or a fake in tests.

use async_trait::async_trait;
use calorie_core::cache::{BoundedCache, CacheConfig, CacheStats};
use calorie_telemetry::metrics;
use fooddata_client::{ApiResult, FoodDataClient, FoodRecord};
use std::sync::Arc;
use tracing::debug;

/// Upstream food database
#[async_trait]
pub trait FoodSource: Send + Sync {
    /// Candidate records for free text, in upstream order
    async fn search(&self, query: &str, page_size: u32) -> ApiResult<Vec<FoodRecord>>;

    /// Full record for one food id
    async fn food_detail(&self, fdc_id: i64) -> ApiResult<FoodRecord>;
}

#[async_trait]
impl FoodSource for FoodDataClient {
    async fn search(&self, query: &str, page_size: u32) -> ApiResult<Vec<FoodRecord>> {
        FoodDataClient::search(self).query(query, page_size).await
    }

    async fn food_detail(&self, fdc_id: i64) -> ApiResult<FoodRecord> {
        self.foods().get(fdc_id).await
    }
}

#[async_trait]
impl<S: FoodSource + ?Sized> FoodSource for Arc<S> {
    async fn search(&self, query: &str, page_size: u32) -> ApiResult<Vec<FoodRecord>> {
        (**self).search(query, page_size).await
    }

    async fn food_detail(&self, fdc_id: i64) -> ApiResult<FoodRecord> {
        (**self).food_detail(fdc_id).await
    }
}

/// A cached upstream response
#[derive(Debug, Clone)]
pub enum CachedResponse {
    /// Search result list (possibly empty)
    Search(Vec<FoodRecord>),
    /// One detail record
    Detail(FoodRecord),
}

/// Cache key for a search; the query is case-folded, the page size kept
#[must_use]
pub fn search_key(query: &str, page_size: u32) -> String {
    format!("search::{}::{page_size}", query.to_lowercase())
}

/// Cache key for a detail lookup
#[must_use]
pub fn food_key(fdc_id: i64) -> String {
    format!("food::{fdc_id}")
}

/// Serves repeated lookups from a shared bounded cache
///
/// Only successful responses are stored, an empty search result included.
/// Concurrent misses for the same key may each reach the inner source.
pub struct CachingSource<S> {
    inner: S,
    cache: Arc<BoundedCache<CachedResponse>>,
}

impl<S: FoodSource> CachingSource<S> {
    /// Wrap `inner` with a fresh cache
    pub fn new(inner: S, config: CacheConfig) -> Self {
        Self::with_cache(inner, Arc::new(BoundedCache::new(config)))
    }

    /// Wrap `inner` with an existing (possibly shared) cache
    pub fn with_cache(inner: S, cache: Arc<BoundedCache<CachedResponse>>) -> Self {
        Self { inner, cache }
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn lookup(&self, key: &str) -> Option<CachedResponse> {
        let hit = self.cache.get(key);
        if hit.is_some() {
            metrics().increment("cache.hit");
            debug!(key = %key, "Cache hit");
        } else {
            metrics().increment("cache.miss");
            debug!(key = %key, "Cache miss");
        }
        hit
    }
}

#[async_trait]
impl<S: FoodSource> FoodSource for CachingSource<S> {
    async fn search(&self, query: &str, page_size: u32) -> ApiResult<Vec<FoodRecord>> {
        let key = search_key(query, page_size);
        if let Some(CachedResponse::Search(foods)) = self.lookup(&key) {
            return Ok(foods);
        }

        let foods = self.inner.search(query, page_size).await?;
        self.cache.put(key, CachedResponse::Search(foods.clone()));
        Ok(foods)
    }

    async fn food_detail(&self, fdc_id: i64) -> ApiResult<FoodRecord> {
        let key = food_key(fdc_id);
        if let Some(CachedResponse::Detail(food)) = self.lookup(&key) {
            return Ok(food);
        }

        let food = self.inner.food_detail(fdc_id).await?;
        self.cache.put(key, CachedResponse::Detail(food.clone()));
        Ok(food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSource, record};
    use std::time::Duration;

    #[test]
    fn test_cache_keys() {
        assert_eq!(search_key("Mac And Cheese", 25), "search::mac and cheese::25");
        assert_eq!(food_key(171_688), "food::171688");
    }

    #[tokio::test]
    async fn test_search_is_cached_case_insensitively() {
        let fake = Arc::new(FakeSource::with_foods(vec![record("Apples, raw", "Foundation")]));
        let source = CachingSource::new(Arc::clone(&fake), CacheConfig::new(16));

        let first = source.search("Apple", 25).await.unwrap();
        let second = source.search("apple", 25).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fake.search_calls(), 1);
        assert_eq!(source.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_page_size_is_part_of_key() {
        let fake = Arc::new(FakeSource::with_foods(vec![]));
        let source = CachingSource::new(Arc::clone(&fake), CacheConfig::new(16));

        source.search("apple", 25).await.unwrap();
        source.search("apple", 10).await.unwrap();
        assert_eq!(fake.search_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached() {
        let fake = Arc::new(FakeSource::with_foods(vec![]));
        let source = CachingSource::new(Arc::clone(&fake), CacheConfig::new(16));

        assert!(source.search("zzz", 25).await.unwrap().is_empty());
        assert!(source.search("zzz", 25).await.unwrap().is_empty());
        assert_eq!(fake.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let fake = Arc::new(FakeSource::failing());
        let source = CachingSource::new(Arc::clone(&fake), CacheConfig::new(16));

        assert!(source.search("apple", 25).await.is_err());
        assert!(source.search("apple", 25).await.is_err());
        assert!(source.food_detail(1).await.is_err());
        assert!(source.food_detail(1).await.is_err());

        assert_eq!(fake.search_calls(), 2);
        assert_eq!(fake.detail_calls(), 2);
        assert_eq!(source.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_detail_is_cached() {
        let mut food = record("Pie, apple", "Survey (FNDDS)");
        food.fdc_id = Some(7);
        let fake = Arc::new(FakeSource::with_foods(vec![food.clone()]));
        let source = CachingSource::new(Arc::clone(&fake), CacheConfig::new(16));

        assert_eq!(source.food_detail(7).await.unwrap(), food);
        assert_eq!(source.food_detail(7).await.unwrap(), food);
        assert_eq!(fake.detail_calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_refetch() {
        let fake = Arc::new(FakeSource::with_foods(vec![]));
        let config = CacheConfig::new(16).with_ttl(Duration::from_millis(20));
        let source = CachingSource::new(Arc::clone(&fake), config);

        source.search("apple", 25).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        source.search("apple", 25).await.unwrap();
        assert_eq!(fake.search_calls(), 2);
    }

    #[tokio::test]
    async fn test_shared_cache_between_sources() {
        let cache = Arc::new(BoundedCache::new(CacheConfig::new(16)));
        let fake = Arc::new(FakeSource::with_foods(vec![]));

        let a = CachingSource::with_cache(Arc::clone(&fake), Arc::clone(&cache));
        let b = CachingSource::with_cache(Arc::clone(&fake), cache);

        a.search("kale", 25).await.unwrap();
        b.search("kale", 25).await.unwrap();
        assert_eq!(fake.search_calls(), 1);
    }
}
