use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

struct Entry<T> {
    stored_at: Instant,
    value: Arc<T>,
}

struct Inner<T> {
    entries: HashMap<String, Entry<T>>,
    // Bumped by every invalidation
    generation: u64,
}

/// Short-lived cache of rendered listings, keyed by request path.
///
/// A zero TTL disables caching: every lookup misses.
///
/// Readers that fill the cache take a [`generation`](Self::generation)
/// before reading the store and hand it back to [`put`](Self::put). A put
/// carrying a generation older than the latest invalidation is dropped, so a
/// listing read before a write can never be stored after that write.
pub struct ListingCache<T> {
    ttl: Duration,
    inner: RwLock<Inner<T>>,
}

impl<T> ListingCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                generation: 0,
            }),
        }
    }

    /// The cached value for `key` if it is still fresh.
    pub async fn get(&self, key: &str) -> Option<Arc<T>> {
        if self.ttl.is_zero() {
            return None;
        }
        let inner = self.inner.read().await;
        inner
            .entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.value))
    }

    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Stores `value` unless an invalidation happened after `generation`
    /// was taken. Returns whether the value was stored.
    pub async fn put(&self, key: &str, value: Arc<T>, generation: u64) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            tracing::debug!("Discarding stale listing for {}", key);
            return false;
        }
        inner.entries.insert(
            key.to_string(),
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
        true
    }

    /// Drops every entry whose key starts with `prefix`.
    pub async fn invalidate(&self, prefix: &str) {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(prefix));
        if inner.entries.len() != before {
            tracing::debug!("Invalidated cached listings under {}", prefix);
        }
    }
}
