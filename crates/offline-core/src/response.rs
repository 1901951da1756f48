//! Response records produced by the network or the cache.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use url::Url;

/// An HTTP response.
///
/// The body is reference counted, so cloning a response is the equivalent of
/// duplicating its body stream: one copy goes to the cache, one to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: Option<Url>,
}

impl Response {
    /// Create an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            url: None,
        }
    }

    /// Create a `200 OK` response with a body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK).with_body(body)
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header, replacing any existing value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Record the URL the response was served from.
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Whether the status is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Body as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response() {
        let resp = Response::ok("hello");
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.is_ok());
        assert_eq!(resp.text(), Some("hello"));
    }

    #[test]
    fn test_error_response_is_not_ok() {
        let resp = Response::new(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!resp.is_ok());
        assert!(resp.body().is_empty());
    }

    #[test]
    fn test_clone_shares_body() {
        let resp = Response::ok(vec![1u8, 2, 3]);
        let copy = resp.clone();
        assert_eq!(resp, copy);
        assert_eq!(resp.body().as_ptr(), copy.body().as_ptr());
    }
}
