//! Scripted network for tests and local hosts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use http::{Method, StatusCode};
use offline_core::{Request, Response};
use url::Url;

use crate::client::{FetchError, FetchOptions, Fetcher};

/// A recorded fetch.
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub method: Method,
    pub url: Url,
    pub options: FetchOptions,
}

#[derive(Debug, Clone)]
enum Route {
    Respond(Response),
    Fail(FetchError),
}

/// Fetcher answering from a table of URL routes.
///
/// Unknown URLs answer `404 Not Found`. While offline every fetch fails with
/// a connection error.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: RwLock<HashMap<String, Route>>,
    offline: AtomicBool,
    calls: Mutex<Vec<FetchCall>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `response`.
    pub fn respond(&self, url: &str, response: Response) {
        self.route(url, Route::Respond(response));
    }

    /// Fail fetches of `url` with `error`.
    pub fn fail(&self, url: &str, error: FetchError) {
        self.route(url, Route::Fail(error));
    }

    /// Simulate losing or regaining connectivity.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fetches issued so far.
    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of fetches issued for `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.url.as_str() == url)
            .count()
    }

    fn route(&self, url: &str, route: Route) {
        if let Ok(mut routes) = self.routes.write() {
            routes.insert(url.to_string(), route);
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request, options: FetchOptions) -> Result<Response, FetchError> {
        let url = request.cache_url();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(FetchCall {
                method: request.method().clone(),
                url: url.clone(),
                options,
            });
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Connection(format!(
                "network unreachable: {}",
                url
            )));
        }

        let route = self
            .routes
            .read()
            .map_err(|_| FetchError::Request("route table poisoned".to_string()))?
            .get(url.as_str())
            .cloned();

        match route {
            Some(Route::Respond(response)) => Ok(response.with_url(url)),
            Some(Route::Fail(error)) => Err(error),
            None => Ok(Response::new(StatusCode::NOT_FOUND).with_url(url)),
        }
    }
}
