//! Plan cache errors.

use thiserror::Error;

/// Errors that can occur when reading or writing a cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A capacity of zero can never hold an entry.
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,

    #[error("cache error: {0}")]
    Other(String),
}
