// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Response Caching Module
 * TTL-bounded memoization for quota-limited intelligence sources
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::{Domain, SourceHits};
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Default freshness window for cached source results (5 minutes)
const DEFAULT_TTL_SECS: u64 = 300;

/// Default maximum cached domains
const DEFAULT_MAX_CAPACITY: u64 = 500;

/// TTL-keyed cache of classified source results, shared across concurrent
/// discovery runs.
///
/// Expiry is write-time only: reads never refresh an entry's lifetime, so a
/// snapshot is served for at most the freshness window after insertion.
/// Only sources expensive or quota-limited enough to warrant memoization
/// consult this cache; cheap idempotent probes bypass it.
pub struct ResponseCache {
    cache: Cache<Domain, SourceHits>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_CAPACITY, DEFAULT_TTL_SECS)
    }

    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        info!(
            max_capacity = max_capacity,
            ttl_secs = ttl_secs,
            "Response cache initialized"
        );

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return a snapshot for the domain if present and not expired
    pub async fn get(&self, domain: &Domain) -> Option<SourceHits> {
        match self.cache.get(domain).await {
            Some(snapshot) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(domain = %domain, hosts = snapshot.len(), "Response cache hit");
                Some(snapshot)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(domain = %domain, "Response cache miss");
                None
            }
        }
    }

    /// Insert or overwrite the snapshot for a domain
    pub async fn put(&self, domain: Domain, snapshot: SourceHits) {
        self.cache.insert(domain, snapshot).await;
    }

    /// Drop all cached entries
    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        debug!("Response cache cleared");
    }

    /// Number of live entries
    pub async fn size(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Response cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Classification;

    fn sample_hits() -> SourceHits {
        let mut hits = SourceHits::new();
        hits.insert("www.example.com".to_string(), Classification::Literal);
        hits.insert("*.dev.example.com".to_string(), Classification::Wildcard);
        hits
    }

    #[tokio::test]
    async fn test_put_then_get_returns_snapshot() {
        let cache = ResponseCache::new();
        let domain = Domain::parse("example.com").unwrap();

        assert!(cache.get(&domain).await.is_none());

        cache.put(domain.clone(), sample_hits()).await;
        let snapshot = cache.get(&domain).await.expect("entry should be fresh");
        assert_eq!(snapshot, sample_hits());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = ResponseCache::with_config(500, 1);
        let domain = Domain::parse("example.com").unwrap();

        cache.put(domain.clone(), sample_hits()).await;
        assert!(cache.get(&domain).await.is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(cache.get(&domain).await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_bound_evicts() {
        let cache = ResponseCache::with_config(2, 300);

        for i in 0..10 {
            let domain = Domain::parse(&format!("domain{}.com", i)).unwrap();
            cache.put(domain, sample_hits()).await;
        }

        assert!(cache.size().await <= 2);
    }

    #[tokio::test]
    async fn test_distinct_domains_do_not_collide() {
        let cache = ResponseCache::new();
        let a = Domain::parse("a.com").unwrap();
        let b = Domain::parse("b.com").unwrap();

        let mut hits_a = SourceHits::new();
        hits_a.insert("www.a.com".to_string(), Classification::Literal);
        cache.put(a.clone(), hits_a.clone()).await;

        assert!(cache.get(&b).await.is_none());
        assert_eq!(cache.get(&a).await, Some(hits_a));
    }
}
