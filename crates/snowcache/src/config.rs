//! Cache construction parameters

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default number of entries when a config omits `capacity`
pub const DEFAULT_CAPACITY: usize = 1024;

/// Settings used by [`LruCache::from_config`](crate::LruCache::from_config)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of entries. Zero disables the cache.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Config with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Parse a config from JSON text
    ///
    /// # Arguments
    /// * `text` - JSON object, e.g. `{"capacity": 256}`
    ///
    /// # Returns
    /// * `Result<CacheConfig>` - Parsed config, missing fields defaulted
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_config_from_json() {
        let cfg = CacheConfig::from_json(r#"{"capacity": 16}"#).unwrap();
        assert_eq!(cfg.capacity, 16);
    }

    #[test]
    fn test_config_defaults() {
        let cfg = CacheConfig::from_json("{}").unwrap();
        assert_eq!(cfg, CacheConfig::default());
        assert_eq!(cfg.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_config_rejects_negative() {
        let err = CacheConfig::from_json(r#"{"capacity": -1}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_rejects_unknown_field() {
        let result = CacheConfig::from_json(r#"{"capacity": 4, "ttl": 10}"#);
        assert!(result.is_err());
    }
}
