//! LRU (Least Recently Used) cache implementation
//!
//! Pairs a [`ConcurrentMap`] from key to node handle with a [`RecencyList`]
//! holding the entries. Every mutation of either structure happens while the
//! list lock is held, so a key is in the map exactly when its node is linked.

use std::hash::Hash;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::list::{NodeHandle, RecencyList, MAX_NODES};
use crate::map::ConcurrentMap;
use crate::stats::CacheStats;

/// Upper bound on up-front allocation; larger caches grow on demand
const PREALLOCATE_MAX: usize = 1 << 16;

/// Thread-safe LRU cache with fixed capacity
///
/// Reads and writes both count as a use. Inserting a new key into a full
/// cache first evicts the least recently used entry. A capacity of zero is
/// allowed and stores nothing.
pub struct LruCache<K, V> {
    /// Key to node handle
    map: ConcurrentMap<K, NodeHandle>,

    /// Entries in recency order
    list: Mutex<RecencyList<K, V>>,

    /// Hit/miss counters
    stats: CacheStats,

    /// Maximum number of entries
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, zero disables the cache
    ///
    /// # Returns
    /// * `Result<LruCache>` - Fails if capacity exceeds [`MAX_NODES`]
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity > MAX_NODES {
            return Err(Error::CapacityTooLarge(capacity));
        }

        let prealloc = capacity.min(PREALLOCATE_MAX);
        debug!(capacity, "creating lru cache");

        Ok(Self {
            map: ConcurrentMap::with_capacity(prealloc),
            list: Mutex::new(RecencyList::with_capacity(prealloc)),
            stats: CacheStats::new(),
            capacity,
        })
    }

    /// Create a cache from a [`CacheConfig`]
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.capacity)
    }

    /// Get a value, marking it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        // Misses are answered from the map alone
        let Some(handle) = self.map.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let mut list = self.list.lock();

        // The node may have been evicted before we took the lock. The map is
        // stable now, so look again.
        let handle = if list.contains(handle) {
            Some(handle)
        } else {
            self.map.get(key)
        };

        let value = handle.and_then(|handle| {
            list.move_to_head(handle);
            list.value(handle).cloned()
        });
        drop(list);

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Insert or overwrite a value, marking it most recently used
    pub fn set(&self, key: K, value: V) {
        if self.capacity == 0 {
            trace!("cache disabled, dropping insert");
            return;
        }

        let mut list = self.list.lock();

        let existing = self.map.get(&key).filter(|&handle| list.contains(handle));
        if let Some(handle) = existing {
            if let Some(slot) = list.value_mut(handle) {
                *slot = value;
            }
            list.move_to_head(handle);
            self.stats.record_update();
            return;
        }

        if list.len() >= self.capacity {
            if let Some(evicted) = list.tail_key() {
                self.map.remove(evicted);
            }
            list.remove_tail();
            self.stats.record_eviction();
            trace!(capacity = self.capacity, "evicted least recently used entry");
        }

        let handle = list.insert_at_head(key.clone(), value);
        self.map.set(key, handle);
        self.stats.record_insert();
    }

    /// Get a value without changing its recency
    pub fn peek(&self, key: &K) -> Option<V> {
        let list = self.list.lock();
        let handle = self.map.get(key)?;
        list.value(handle).cloned()
    }

    /// Check whether a key is cached, without changing its recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Remove a key, returning its value
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut list = self.list.lock();
        let handle = self.map.remove(key)?;
        list.remove(handle).map(|(_, value)| value)
    }

    /// Remove every entry (statistics are kept)
    pub fn clear(&self) {
        let mut list = self.list.lock();
        self.map.clear();
        list.clear();
        debug!(capacity = self.capacity, "cleared lru cache");
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.list.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        self.list.lock().iter().map(|(key, _)| key.clone()).collect()
    }

    /// Check that map and list agree and capacity holds
    ///
    /// Every map entry must point at a linked node carrying the same key, the
    /// two must have the same size, and the list links must be intact.
    pub fn is_consistent(&self) -> bool {
        let list = self.list.lock();

        if !list.is_well_formed() || list.len() > self.capacity {
            return false;
        }

        let keys = self.map.keys();
        if keys.len() != list.len() {
            return false;
        }

        keys.iter().all(|key| {
            self.map
                .get(key)
                .and_then(|handle| list.key(handle))
                .is_some_and(|linked| linked == key)
        })
    }
}
