//! Results of fetch interception.

use std::fmt;

use futures::future::BoxFuture;
use offline_core::Response;

use crate::strategy::Strategy;

/// Work that outlives the response, such as a cache refresh.
///
/// The host must drive it to completion (the `waitUntil` analogue).
pub type BackgroundTask = BoxFuture<'static, ()>;

/// Where an answered response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Live network response.
    Network,
    /// Cached copy of the requested resource.
    Cache,
    /// Cached root document standing in for the request.
    Fallback,
    /// Nothing available.
    None,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Cache => write!(f, "CACHE"),
            Self::Fallback => write!(f, "FALLBACK"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// What the host should do with an intercepted request.
#[derive(Debug, Clone)]
pub enum Disposition {
    /// Not intercepted: the host performs the request as if no worker existed.
    PassThrough,
    /// Answer with `response`. `None` surfaces as a network error to the page.
    Respond {
        strategy: Strategy,
        source: ResponseSource,
        response: Option<Response>,
    },
}

/// Result of handling one fetch event.
///
/// A stale-while-revalidate hit carries a background refresh that has not
/// started yet. Dropping the outcome without running it skips the refresh.
#[must_use = "the background refresh only runs when the host drives it"]
pub struct FetchOutcome {
    disposition: Disposition,
    background: Option<BackgroundTask>,
}

impl FetchOutcome {
    pub(crate) fn pass_through() -> Self {
        Self {
            disposition: Disposition::PassThrough,
            background: None,
        }
    }

    pub(crate) fn respond(
        strategy: Strategy,
        source: ResponseSource,
        response: Option<Response>,
    ) -> Self {
        Self {
            disposition: Disposition::Respond {
                strategy,
                source,
                response,
            },
            background: None,
        }
    }

    pub(crate) fn with_background(mut self, task: Option<BackgroundTask>) -> Self {
        self.background = task;
        self
    }

    pub fn disposition(&self) -> &Disposition {
        &self.disposition
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self.disposition, Disposition::PassThrough)
    }

    pub fn strategy(&self) -> Option<Strategy> {
        match &self.disposition {
            Disposition::Respond { strategy, .. } => Some(*strategy),
            Disposition::PassThrough => None,
        }
    }

    pub fn source(&self) -> ResponseSource {
        match &self.disposition {
            Disposition::Respond { source, .. } => *source,
            Disposition::PassThrough => ResponseSource::None,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        match &self.disposition {
            Disposition::Respond { response, .. } => response.as_ref(),
            Disposition::PassThrough => None,
        }
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Detach the background task so the host can run it separately.
    ///
    /// The task is lazy: the host must spawn or await it, otherwise the
    /// cache is never refreshed.
    #[must_use = "dropping the task cancels the cache refresh"]
    pub fn take_background(&mut self) -> Option<BackgroundTask> {
        self.background.take()
    }

    /// Split into the disposition and the background task.
    ///
    /// Same contract as [`take_background`](Self::take_background): a
    /// returned task must be spawned or awaited for the refresh to happen.
    #[must_use = "dropping the task cancels the cache refresh"]
    pub fn into_parts(self) -> (Disposition, Option<BackgroundTask>) {
        (self.disposition, self.background)
    }

    /// Run any background task to completion and return the disposition.
    pub async fn settle(self) -> Disposition {
        if let Some(task) = self.background {
            task.await;
        }
        self.disposition
    }
}

impl fmt::Debug for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOutcome")
            .field("disposition", &self.disposition)
            .field("background", &self.background.is_some())
            .finish()
    }
}
