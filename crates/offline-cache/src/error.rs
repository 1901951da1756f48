//! Cache error types.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur when using cache storage.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Only GET requests can be stored.
    #[error("cannot store response for {method} request to {url}")]
    UnsupportedMethod { method: String, url: String },

    /// Backend storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CacheError {
    pub(crate) fn poisoned() -> Self {
        Self::Storage("cache lock poisoned".to_string())
    }
}
