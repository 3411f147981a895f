//! Cache Store Module
//!
//! HashMap-backed cache with absolute TTL expiration and explicit invalidation.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Key/value cache where every entry expires a fixed time after insertion.
///
/// Reads never extend an entry's lifetime. Expired entries are dropped lazily
/// on lookup and in bulk by [`CacheStore::cleanup_expired`].
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL in seconds applied by `insert`
    default_ttl: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store whose entries live `default_ttl` seconds.
    pub fn new(default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Insert ==
    /// Stores `value` under `key` with the default TTL, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.default_ttl;
        self.insert_with_ttl(key, value, Some(ttl));
    }

    /// Stores `value` under `key` with an explicit TTL (None = never expires).
    pub fn insert_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Option<u64>) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a clone of the cached value if present and not expired.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expirations(1);
                self.stats.record_miss();
                self.stats.set_total_entries(self.entries.len());
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Invalidate ==
    /// Removes `key`. Returns true if an entry was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidation();
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(300);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), 300);
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = CacheStore::new(300);

        store.insert("key1", "value1".to_string());

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_missing() {
        let mut store: CacheStore<u32> = CacheStore::new(300);
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_invalidate() {
        let mut store = CacheStore::new(300);
        store.insert("key1", 1);

        assert!(store.invalidate("key1"));
        assert!(!store.invalidate("key1"));
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(300);

        store.insert("key1", 1);
        store.insert("key1", 2);

        assert_eq!(store.get("key1"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(1);
        store.insert("key1", 1);

        sleep(Duration::from_millis(1100));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key1"), None);
        let stats = store.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_reads_do_not_extend_expiration() {
        let mut store = CacheStore::new(1);
        store.insert("key1", 1);

        sleep(Duration::from_millis(600));
        assert_eq!(store.get("key1"), Some(1));
        sleep(Duration::from_millis(600));

        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(300);

        store.insert_with_ttl("short", 1, Some(1));
        store.insert_with_ttl("long", 2, Some(10));
        store.insert_with_ttl("forever", 3, None);

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("long"), Some(2));
        assert_eq!(store.get("forever"), Some(3));
    }
}
