use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use crate::catalog::Metadata;
use crate::config::CacheConfig;
use crate::metrics;
use crate::resolver::ResolvedStream;
use crate::searcher::TorrentCandidate;

/// A cached value with its expiry deadline.
#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    expires_at: Instant,
}

/// A single key/value cache with per-entry TTL and hit/miss counters.
///
/// Values are cloned in and out; entries are owned by the cache and never
/// shared by reference. Expiry uses `tokio::time::Instant`, so tests can
/// drive it with a paused runtime clock.
pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry<T>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a key, counting the outcome.
    ///
    /// A stale entry counts as a miss and is evicted before returning.
    pub async fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        let stale = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    metrics::CACHE_LOOKUPS
                        .with_label_values(&[self.name, "hit"])
                        .inc();
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if stale {
            let mut entries = self.entries.write().await;
            // Re-check under the write lock; a concurrent insert may have
            // refreshed the entry in the meantime.
            if let Some(entry) = entries.get(key) {
                if entry.expires_at > now {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    metrics::CACHE_LOOKUPS
                        .with_label_values(&[self.name, "hit"])
                        .inc();
                    return Some(entry.value.clone());
                }
                entries.remove(key);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::CACHE_LOOKUPS
            .with_label_values(&[self.name, "miss"])
            .inc();
        None
    }

    /// Insert or overwrite a value under the cache's TTL.
    pub async fn insert(&self, key: &str, value: T) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    async fn tier_stats(&self) -> CacheTierStats {
        CacheTierStats {
            entries: self.len().await,
            hits: self.hits(),
            misses: self.misses(),
        }
    }
}

/// Counters and live size for one cache tier.
#[derive(Debug, Clone, Serialize)]
pub struct CacheTierStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Stats across all three tiers.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub metadata: CacheTierStats,
    pub search: CacheTierStats,
    pub streams: CacheTierStats,
}

/// The three independent caches used by the pipeline.
///
/// Each tier is locked separately; there are no cross-tier transactions.
pub struct CacheStore {
    metadata: TtlCache<Metadata>,
    search: TtlCache<Vec<TorrentCandidate>>,
    streams: TtlCache<ResolvedStream>,
}

impl CacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            metadata: TtlCache::new("metadata", Duration::from_secs(config.metadata_ttl_secs)),
            search: TtlCache::new("search", Duration::from_secs(config.search_ttl_secs)),
            streams: TtlCache::new("streams", Duration::from_secs(config.stream_ttl_secs)),
        }
    }

    pub fn metadata(&self) -> &TtlCache<Metadata> {
        &self.metadata
    }

    pub fn search(&self) -> &TtlCache<Vec<TorrentCandidate>> {
        &self.search
    }

    pub fn streams(&self) -> &TtlCache<ResolvedStream> {
        &self.streams
    }

    /// Live entry counts per tier: (metadata, search, streams).
    pub async fn sizes(&self) -> (usize, usize, usize) {
        (
            self.metadata.len().await,
            self.search.len().await,
            self.streams.len().await,
        )
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            metadata: self.metadata.tier_stats().await,
            search: self.search.tier_stats().await,
            streams: self.streams.tier_stats().await,
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
