//! Thread-safe hash map with many readers and one writer at a time

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;
use parking_lot::RwLock;

/// Hash map guarded by a read/write lock
///
/// Reads share the lock and never observe a half-written entry. Writes hold
/// the lock exclusively and are visible to every read that starts after the
/// write returns.
pub struct ConcurrentMap<K, V> {
    inner: RwLock<HashMap<K, V, RandomState>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Hash + Eq,
{
    /// Create an empty map
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::with_capacity_and_hasher(
                capacity,
                RandomState::new(),
            )),
        }
    }

    /// Get a copy of the value stored under `key`
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Store `value` under `key`, returning the value it replaced
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Snapshot of the current keys, in no particular order
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.read().keys().cloned().collect()
    }
}

impl<K: Hash + Eq, V> Default for ConcurrentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_map_basic() {
        let map = ConcurrentMap::new();

        assert_eq!(map.set("a", 1), None);
        assert_eq!(map.set("b", 2), None);

        assert_eq!(map.get(&"a"), Some(1));
        assert_eq!(map.get(&"b"), Some(2));
        assert_eq!(map.get(&"c"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_map_overwrite() {
        let map = ConcurrentMap::new();

        map.set(1, "a");
        assert_eq!(map.set(1, "b"), Some("a"));

        assert_eq!(map.get(&1), Some("b"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_map_remove_and_clear() {
        let map = ConcurrentMap::with_capacity(4);

        map.set(1, "a");
        map.set(2, "b");
        map.set(3, "c");

        assert_eq!(map.remove(&2), Some("b"));
        assert_eq!(map.remove(&2), None);
        assert!(!map.contains_key(&2));

        let mut keys = map.keys();
        keys.sort();
        assert_eq!(keys, vec![1, 3]);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(&1), None);
    }

    #[test]
    fn test_map_write_visible_after_return() {
        let map = Arc::new(ConcurrentMap::new());

        let writer = {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..1000u64 {
                    map.set(i, i * 2);
                }
            })
        };
        writer.join().unwrap();

        for i in 0..1000u64 {
            assert_eq!(map.get(&i), Some(i * 2));
        }
    }

    #[test]
    fn test_map_concurrent_readers_and_writers() {
        let map = Arc::new(ConcurrentMap::new());
        let mut handles = Vec::new();

        for t in 0..4u64 {
            let map = Arc::clone(&map);
            handles.push(thread::spawn(move || {
                for i in 0..500u64 {
                    let key = i % 50;
                    // Each write stores a pair that must stay matched
                    map.set(key, (t, t));
                    if let Some((a, b)) = map.get(&key) {
                        assert_eq!(a, b);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.len(), 50);
    }
}
