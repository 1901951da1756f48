//! Request matching rules.

use offline_core::Request;
use url::Url;

/// Options for cache lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare URLs without their query string.
    pub ignore_search: bool,
    /// Match non-GET requests as if they were GET.
    pub ignore_method: bool,
}

impl MatchOptions {
    /// Exact matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore the query string of both URLs.
    pub fn ignore_search(mut self) -> Self {
        self.ignore_search = true;
        self
    }

    /// Ignore the request method.
    pub fn ignore_method(mut self) -> Self {
        self.ignore_method = true;
        self
    }
}

/// The identity a request is stored and looked up under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Url);

impl CacheKey {
    /// Key for a request under the given options.
    pub fn for_request(request: &Request, options: MatchOptions) -> Self {
        if options.ignore_search {
            Self(request.cache_url_without_search())
        } else {
            Self(request.cache_url())
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a stored request answers a lookup.
///
/// A non-GET lookup never matches unless `ignore_method` is set.
pub fn request_matches(stored: &Request, query: &Request, options: MatchOptions) -> bool {
    if !options.ignore_method && !query.is_get() {
        return false;
    }
    CacheKey::for_request(stored, options) == CacheKey::for_request(query, options)
}
