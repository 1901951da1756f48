//! Worker error types.

use offline_cache::CacheError;
use offline_core::{ConfigError, WorkerState};
use offline_fetch::FetchError;

/// Errors raised by lifecycle handlers.
///
/// Fetch handling never fails; its errors degrade to cached fallbacks.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("precache of {url} failed: {source}")]
    Precache {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("cache storage error: {0}")]
    Cache(#[from] CacheError),

    #[error("client control failed: {0}")]
    Clients(#[source] anyhow::Error),

    #[error("illegal transition from {from} to {to}")]
    InvalidTransition { from: WorkerState, to: WorkerState },
}
