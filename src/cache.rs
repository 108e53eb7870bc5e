//! Time-bounded caching for remote lookups
//!
//! Two cache shapes back a session: a keyed [`TtlCache`] for per-file fetch
//! results and a single-slot [`TtlCell`] for the resolved file list. Both
//! store an explicit expiry per entry and expose manual invalidation as the
//! refresh entry point. Caches are only touched from the orchestrating
//! session, never from worker tasks.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Keyed cache where every entry expires `ttl` after insertion.
///
/// Expired entries are treated as absent by [`get`](TtlCache::get) and
/// dropped lazily on the next [`insert`](TtlCache::insert) for their key.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Create an empty cache with the given time-to-live per entry.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry. Expired entries return `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).filter(|e| e.is_live()).map(|e| &e.value)
    }

    /// Insert a value, stamping its expiry from the cache TTL.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, Entry::new(value, self.ttl));
    }

    /// Drop a single entry. Returns whether anything was removed.
    pub fn invalidate<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| e.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-value cache slot with the same expiry rules as [`TtlCache`].
pub struct TtlCell<V> {
    ttl: Duration,
    slot: Option<Entry<V>>,
}

impl<V> TtlCell<V> {
    /// Create an empty cell with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    /// The live value, if one is present and unexpired.
    pub fn get(&self) -> Option<&V> {
        self.slot.as_ref().filter(|e| e.is_live()).map(|e| &e.value)
    }

    /// Replace the value, stamping a fresh expiry.
    pub fn set(&mut self, value: V) {
        self.slot = Some(Entry::new(value, self.ttl));
    }

    /// Drop the value. Returns whether one was present.
    pub fn invalidate(&mut self) -> bool {
        self.slot.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_clear() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_refreshes_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        cache.insert("a".to_string(), 2);
        assert_eq!(cache.get("a"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cell_set_get_invalidate() {
        let mut cell = TtlCell::new(Duration::from_secs(60));
        assert!(cell.get().is_none());
        cell.set(vec!["a.json".to_string()]);
        assert_eq!(cell.get().map(|v| v.len()), Some(1));
        assert!(cell.invalidate());
        assert!(cell.get().is_none());
        assert!(!cell.invalidate());
    }

    #[test]
    fn test_cell_zero_ttl() {
        let mut cell = TtlCell::new(Duration::ZERO);
        cell.set(1);
        assert!(cell.get().is_none());
    }
}
