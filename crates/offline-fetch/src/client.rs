//! Host fetch trait and options.

use async_trait::async_trait;
use offline_core::{Request, Response};

/// Error type for fetch operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// Whether the failure happened before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// How the fetch interacts with intermediate HTTP caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Normal HTTP cache semantics.
    #[default]
    Default,
    /// Bypass HTTP caches entirely and do not store the result.
    NoStore,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::NoStore => "no-store",
        }
    }
}

/// Options for a single fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchOptions {
    /// Cache directive.
    pub cache: CacheMode,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch bypassing any intermediate cache.
    pub fn no_store() -> Self {
        Self {
            cache: CacheMode::NoStore,
        }
    }
}

/// Host-provided network access.
///
/// An HTTP error status is a successful fetch: implementations return `Err`
/// only when no response could be obtained.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request, options: FetchOptions) -> Result<Response, FetchError>;
}

/// Turn a non-OK response into an error.
pub fn ensure_ok(request: &Request, response: Response) -> Result<Response, FetchError> {
    if response.is_ok() {
        Ok(response)
    } else {
        Err(FetchError::Http {
            status: response.status().as_u16(),
            url: request.url().to_string(),
        })
    }
}
