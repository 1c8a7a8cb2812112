use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::debug;

use crate::config::CacheConfig;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |expires_at| now >= expires_at)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub current_size: usize,
    pub max_size: usize,
    pub hit_rate: f64,
}

impl CacheStats {
    fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    fn record_hit(&mut self) {
        self.hits += 1;
        self.update_hit_rate();
    }

    fn record_miss(&mut self) {
        self.misses += 1;
        self.update_hit_rate();
    }

    fn update_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hit_rate = self.hits as f64 / total as f64;
        }
    }
}

/// Bounded LRU cache with per-entry expiry.
///
/// Expired entries are dropped lazily when read, and swept in bulk at most
/// once per `cleanup_interval_seconds`.
#[derive(Debug)]
pub struct CacheManager<V> {
    cache: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
    config: CacheConfig,
    stats: Arc<RwLock<CacheStats>>,
    last_cleanup: Arc<Mutex<Instant>>,
}

impl<V> Clone for CacheManager<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
            stats: Arc::clone(&self.stats),
            last_cleanup: Arc::clone(&self.last_cleanup),
        }
    }
}

impl<V: Clone> CacheManager<V> {
    pub fn new(config: CacheConfig) -> Self {
        let capacity = std::num::NonZeroUsize::new(config.max_size)
            .unwrap_or(std::num::NonZeroUsize::MIN);

        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            stats: Arc::new(RwLock::new(CacheStats::new(capacity.get()))),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
            config,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.cleanup_expired_if_needed();

        let now = Instant::now();
        let mut cache = self.cache.lock();

        let (value, expired) = match cache.get(key) {
            Some(entry) if !entry.is_expired(now) => (Some(entry.value.clone()), false),
            Some(_) => (None, true),
            None => (None, false),
        };

        if let Some(value) = value {
            drop(cache);
            self.record(|stats| stats.record_hit());
            debug!("Cache hit for key: {}", key);
            return Some(value);
        }

        if expired {
            cache.pop(key);
            let size = cache.len();
            drop(cache);
            self.record(|stats| {
                stats.expirations += 1;
                stats.current_size = size;
            });
            debug!("Cache entry expired for key: {}", key);
        } else {
            drop(cache);
            debug!("Cache miss for key: {}", key);
        }

        self.record(|stats| stats.record_miss());
        None
    }

    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Option<Duration>) {
        let mut cache = self.cache.lock();
        let evicted = cache
            .push(key.to_string(), CacheEntry::new(value, ttl))
            .map_or(false, |(old_key, _)| old_key != key);
        let size = cache.len();
        drop(cache);

        self.record(|stats| {
            if evicted {
                stats.evictions += 1;
            }
            stats.current_size = size;
        });

        debug!("Cached value for key: {} (TTL: {:?})", key, ttl);
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.read().clone();
        stats.current_size = self.len();
        stats
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        if self.config.enable_stats {
            update(&mut self.stats.write());
        }
    }

    fn cleanup_expired_if_needed(&self) {
        let interval = Duration::from_secs(self.config.cleanup_interval_seconds);
        let now = Instant::now();

        {
            let mut last_cleanup = self.last_cleanup.lock();
            if now.duration_since(*last_cleanup) < interval {
                return;
            }
            *last_cleanup = now;
        }

        self.cleanup_expired(now);
    }

    fn cleanup_expired(&self, now: Instant) {
        let mut cache = self.cache.lock();
        let expired: Vec<String> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            cache.pop(key);
        }
        let size = cache.len();
        drop(cache);

        if !expired.is_empty() {
            let removed = expired.len() as u64;
            self.record(|stats| {
                stats.expirations += removed;
                stats.current_size = size;
            });
            debug!("Swept {} expired cache entries", removed);
        }
    }
}
