//! Ordered fallback attempts.

use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use offline_core::Response;

use crate::outcome::ResponseSource;

/// A sequence of lookups tried in order until one yields a response.
///
/// Attempts are lazy futures: an attempt after the first success is dropped
/// without ever being polled.
#[derive(Default)]
pub struct FallbackChain<'a> {
    attempts: Vec<(ResponseSource, BoxFuture<'a, Option<Response>>)>,
}

impl<'a> FallbackChain<'a> {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    /// Append an attempt, tagged with where its response comes from.
    pub fn then<F>(mut self, source: ResponseSource, attempt: F) -> Self
    where
        F: Future<Output = Option<Response>> + Send + 'a,
    {
        self.attempts.push((source, attempt.boxed()));
        self
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Run attempts in order and return the first response.
    pub async fn resolve(self) -> (Option<Response>, ResponseSource) {
        for (source, attempt) in self.attempts {
            if let Some(response) = attempt.await {
                return (Some(response), source);
            }
        }
        (None, ResponseSource::None)
    }
}
