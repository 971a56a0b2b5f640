//! Error types for snowcache

use std::fmt;

/// Result type alias for snowcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a cache
///
/// Lookups and inserts on a constructed cache never fail; a miss is `None`.
#[derive(Debug)]
pub enum Error {
    /// Capacity exceeds what node handles can address
    CapacityTooLarge(usize),

    /// Configuration text could not be parsed
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityTooLarge(capacity) => write!(
                f,
                "Capacity too large: {} entries (max {})",
                capacity,
                crate::list::MAX_NODES
            ),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
