//! Request records consumed per interception.

use http::header::{HeaderName, HeaderValue, ACCEPT};
use http::{HeaderMap, Method};
use url::{Origin, Url};

/// How the page issued the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level page navigation.
    Navigate,
    /// Same-origin only subresource request.
    SameOrigin,
    /// Opaque cross-origin request.
    NoCors,
    /// CORS subresource request.
    #[default]
    Cors,
}

impl RequestMode {
    /// Get the mode name as used by the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::SameOrigin => "same-origin",
            Self::NoCors => "no-cors",
            Self::Cors => "cors",
        }
    }
}

/// A request intercepted from a controlled page.
///
/// Requests are transient: they are used as cache keys and handed to the
/// fetcher, never persisted on their own.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    mode: RequestMode,
}

impl Request {
    /// Create a request with the given method.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            mode: RequestMode::default(),
        }
    }

    /// Create a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a navigation request, as issued when the page loads a document.
    pub fn navigate(url: Url) -> Self {
        Self::get(url).with_mode(RequestMode::Navigate)
    }

    /// Parse a URL and create a request for it.
    pub fn parse(method: Method, url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(method, Url::parse(url)?))
    }

    /// Set the request mode.
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a header, replacing any existing value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the `accept` header.
    pub fn with_accept(self, value: &'static str) -> Self {
        self.with_header(ACCEPT, HeaderValue::from_static(value))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether this is a GET request.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Whether the page is navigating to a document.
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Whether the `accept` header asks for HTML.
    pub fn accepts_html(&self) -> bool {
        self.header(ACCEPT.as_str())
            .map(|accept| accept.contains("text/html"))
            .unwrap_or(false)
    }

    /// Whether the request is for an HTML document, by mode or by `accept`.
    pub fn wants_document(&self) -> bool {
        self.is_navigation() || self.accepts_html()
    }

    /// Origin of the requested URL.
    pub fn origin(&self) -> Origin {
        self.url.origin()
    }

    /// URL used for cache identity: the request URL without its fragment.
    pub fn cache_url(&self) -> Url {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url
    }

    /// Cache identity with the query string removed as well.
    pub fn cache_url_without_search(&self) -> Url {
        let mut url = self.cache_url();
        url.set_query(None);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_navigation_wants_document() {
        let req = Request::navigate(url("https://app.example/chat/"));
        assert!(req.is_navigation());
        assert!(req.wants_document());
        assert_eq!(req.mode().as_str(), "navigate");
    }

    #[test]
    fn test_accept_header_detects_html() {
        let req = Request::get(url("https://app.example/chat/page"))
            .with_accept("text/html,application/xhtml+xml;q=0.9");
        assert!(!req.is_navigation());
        assert!(req.accepts_html());
        assert!(req.wants_document());
    }

    #[test]
    fn test_non_html_request() {
        let req = Request::get(url("https://app.example/chat/app.js")).with_accept("*/*");
        assert!(!req.wants_document());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = Request::get(url("https://app.example/")).with_accept("text/html");
        assert_eq!(req.header("Accept"), Some("text/html"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn test_cache_urls() {
        let req = Request::get(url("https://app.example/chat/index.html?v=2#top"));
        assert_eq!(
            req.cache_url().as_str(),
            "https://app.example/chat/index.html?v=2"
        );
        assert_eq!(
            req.cache_url_without_search().as_str(),
            "https://app.example/chat/index.html"
        );
    }

    #[test]
    fn test_parse_method() {
        let req = Request::parse(Method::POST, "https://app.example/api/send").unwrap();
        assert!(!req.is_get());
        assert!(Request::parse(Method::GET, "not a url").is_err());
    }
}
