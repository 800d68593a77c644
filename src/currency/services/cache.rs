//! Keyed in-memory cache with a fixed time-to-live.

use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Cache whose entries expire a fixed duration after they were written.
///
/// Expiry is evaluated against the injected clock on every read; expired
/// entries are never served. Concurrent writers follow last-write-wins.
pub struct TtlCache<K, V, C>
where
    C: Clock + Send + Sync + ?Sized,
{
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: Duration,
    clock: Arc<C>,
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock + Send + Sync + ?Sized,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<C>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Returns a copy of the value if present and unexpired.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.utc();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    /// Stores `value`, replacing any previous entry for `key`.
    pub fn insert(&self, key: K, value: V) {
        let expires_at = self
            .clock
            .utc()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, Entry { value, expires_at });
    }
}
