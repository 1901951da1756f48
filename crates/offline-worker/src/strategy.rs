//! Per-request caching strategies.

use offline_core::Request;
use url::Origin;

/// How a GET request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Live fetch first, cached copy when offline. Used for documents.
    NetworkFirst,
    /// Cached copy first, refreshed from the network. Used for same-origin assets.
    StaleWhileRevalidate,
    /// Live fetch, any cached copy on failure. Used for cross-origin requests.
    NetworkOnly,
}

impl Strategy {
    /// Pick the strategy for a request, or `None` when it must pass through.
    ///
    /// Documents are detected before origin, so a cross-origin navigation is
    /// still handled network-first.
    pub fn for_request(request: &Request, origin: &Origin) -> Option<Self> {
        if !request.is_get() {
            return None;
        }

        if request.wants_document() {
            Some(Self::NetworkFirst)
        } else if request.origin() == *origin {
            Some(Self::StaleWhileRevalidate)
        } else {
            Some(Self::NetworkOnly)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkFirst => "network-first",
            Self::StaleWhileRevalidate => "stale-while-revalidate",
            Self::NetworkOnly => "network-only",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
