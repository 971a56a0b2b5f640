//! # snowcache
//!
//! Concurrent, fixed-capacity LRU cache.
//!
//! ## Architecture
//! - **ConcurrentMap**: AHash map behind a read/write lock, key -> node handle
//! - **RecencyList**: arena-backed doubly-linked list, O(1) promote and evict
//! - **LruCache**: keeps the two in lock-step; the only type most callers need
//!
//! ```
//! use snowcache::LruCache;
//!
//! let cache = LruCache::new(2)?;
//! cache.set(1, "a");
//! cache.set(2, "b");
//! assert_eq!(cache.get(&1), Some("a"));
//! cache.set(3, "c"); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! # Ok::<(), snowcache::Error>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod list;
mod lru;
mod map;
mod stats;

pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use list::{Iter, NodeHandle, RecencyList, MAX_NODES};
pub use lru::LruCache;
pub use map::ConcurrentMap;
pub use stats::{CacheStats, StatsSnapshot};
