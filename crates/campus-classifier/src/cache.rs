//! Bounded prediction cache.
//!
//! Keyed by exact input text. Purely a latency optimization: a miss always
//! recomputes, never errors, and correctness must not depend on hit rate.
//!
//! ## Thread Safety
//!
//! - LRU cache protected by Mutex (inference dominates latency, so lock
//!   contention on cache bookkeeping is negligible)
//! - Hit/miss counters are atomics so `stats()` never takes the lock path
//!   on the hot counters

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;

use crate::model::CacheStats;

/// A cached successful prediction. Timing is not cached: it describes one
/// call, not the input.
#[derive(Debug, Clone)]
struct CachedPrediction {
    label: String,
    confidence: f32,
}

/// LRU cache over successful classifications.
///
/// Error results are never inserted, so a transient inference failure
/// cannot be replayed out of the cache.
pub struct PredictionCache {
    entries: Mutex<LruCache<String, CachedPrediction>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PredictionCache {
    /// Create a cache with the given capacity. A zero capacity is clamped
    /// to one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity must be > 0 after max(1)");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a prediction by exact input text, updating recency and
    /// hit/miss counters.
    pub fn get(&self, text: &str) -> Option<(String, f32)> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(text) {
            Some(cached) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some((cached.label.clone(), cached.confidence))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a successful prediction, evicting the least-recently-used
    /// entry when full.
    pub fn insert(&self, text: &str, label: &str, confidence: f32) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.put(
            text.to_string(),
            CachedPrediction {
                label: label.to_string(),
                confidence,
            },
        );
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: entries.len(),
            capacity: entries.cap().get(),
        }
    }
}
