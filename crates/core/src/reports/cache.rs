//! Report result caching using Moka.
//!
//! Entries are keyed by report name, request, reference date and snapshot
//! revision, so a cached figure is only ever served for the same ledger
//! state it was computed from.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache;

use super::error::ReportError;

/// Cache key for one report computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Report name.
    pub report: &'static str,
    /// Canonical request encoding.
    pub request: String,
    /// Reference date the request was resolved against.
    pub today: NaiveDate,
    /// Ledger snapshot revision.
    pub revision: u64,
}

type Cached = Arc<dyn Any + Send + Sync>;

/// Cache for computed reports.
#[derive(Clone)]
pub struct ReportCache {
    cache: Cache<CacheKey, Cached>,
}

impl ReportCache {
    /// Creates a cache, or `None` when `max_capacity` is zero.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Option<Self> {
        if max_capacity == 0 {
            return None;
        }
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Some(Self { cache })
    }

    /// Returns the cached report for `key`, computing and storing it on a miss.
    ///
    /// Failed computations are not cached.
    pub async fn get_or_compute<T, F>(&self, key: CacheKey, compute: F) -> Result<T, ReportError>
    where
        T: Clone + Send + Sync + 'static,
        F: Future<Output = Result<T, ReportError>>,
    {
        if let Some(hit) = self.cache.get(&key).await {
            if let Some(value) = hit.downcast_ref::<T>() {
                return Ok(value.clone());
            }
        }

        let value = compute.await?;
        self.cache.insert(key, Arc::new(value.clone())).await;
        Ok(value)
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance so counts are up to date.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}
