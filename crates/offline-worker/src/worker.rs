//! The request interceptor and its lifecycle handlers.

use std::sync::{Arc, RwLock};

use futures::future::{self, FutureExt};
use http::StatusCode;
use offline_cache::{CachePartition, CacheStorage, MatchOptions};
use offline_core::{
    CacheNames, LifecycleObserver, Request, Response, Scope, WorkerConfig, WorkerState,
};
use offline_fetch::{ensure_ok, FetchOptions, Fetcher};
use tracing::{debug, info, warn, Instrument};
use url::Url;

use crate::error::WorkerError;
use crate::fallback::FallbackChain;
use crate::host::Clients;
use crate::message::ControlMessage;
use crate::outcome::{FetchOutcome, ResponseSource};
use crate::strategy::Strategy;

/// One version of the offline worker.
///
/// Owns the static and runtime partitions named after its version and
/// answers fetch events once activated.
pub struct OfflineWorker {
    config: WorkerConfig,
    names: CacheNames,
    scope: Scope,
    precache: Vec<Url>,
    offline_document: Url,
    caches: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    clients: Arc<dyn Clients>,
    state: RwLock<WorkerState>,
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl OfflineWorker {
    /// Create a worker in the `Installing` state.
    pub fn new(
        config: WorkerConfig,
        scope: Scope,
        caches: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        clients: Arc<dyn Clients>,
    ) -> Result<Self, WorkerError> {
        config.validate()?;
        let precache = config.precache_set(&scope)?;
        let offline_document = config.offline_document_url(&scope)?;

        Ok(Self {
            names: config.cache_names(),
            config,
            scope,
            precache,
            offline_document,
            caches,
            fetcher,
            clients,
            state: RwLock::new(WorkerState::Installing),
            observers: Vec::new(),
        })
    }

    /// Register a lifecycle observer.
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn cache_names(&self) -> &CacheNames {
        &self.names
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Absolute precache URLs, in configured order.
    pub fn precache_urls(&self) -> &[Url] {
        &self.precache
    }

    /// Handle the install event.
    ///
    /// Fetches every precache URL and stores them in the static partition as a
    /// single batch. If any fetch fails or answers a non-OK status nothing is
    /// stored and the worker becomes redundant.
    pub async fn install(&self) -> Result<(), WorkerError> {
        let state = self.state();
        if state != WorkerState::Installing {
            return Err(WorkerError::InvalidTransition {
                from: state,
                to: WorkerState::Installed,
            });
        }

        let span = tracing::info_span!("install", version = %self.config.version);
        async {
            self.clients.skip_waiting().await;

            match self.precache_all().await {
                Ok(count) => {
                    info!(
                        partition = %self.names.static_cache,
                        entries = count,
                        "precache complete"
                    );
                    self.transition(WorkerState::Installed)
                }
                Err(error) => {
                    warn!(%error, "install failed");
                    self.transition(WorkerState::Redundant)?;
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn precache_all(&self) -> Result<usize, WorkerError> {
        let partition = self.caches.open(&self.names.static_cache).await?;

        let fetches = self.precache.iter().map(|url| {
            let request = Request::get(url.clone());
            async move {
                let response = self
                    .fetcher
                    .fetch(&request, FetchOptions::new())
                    .await
                    .and_then(|response| ensure_ok(&request, response))
                    .map_err(|source| WorkerError::Precache {
                        url: url.to_string(),
                        source,
                    })?;
                Ok::<_, WorkerError>((request, response))
            }
        });
        let entries = future::try_join_all(fetches).await?;

        let count = entries.len();
        partition.put_all(entries).await?;
        Ok(count)
    }

    /// Handle the activate event.
    ///
    /// Deletes every partition not owned by this version, then claims all
    /// open pages. Returns the names of the deleted partitions.
    ///
    /// A failed activation leaves the worker in `Activating`; calling
    /// `activate` again resumes from there.
    pub async fn activate(&self) -> Result<Vec<String>, WorkerError> {
        let span = tracing::info_span!("activate", version = %self.config.version);
        async {
            if self.state() == WorkerState::Activating {
                debug!("resuming interrupted activation");
            } else {
                self.transition(WorkerState::Activating)?;
            }

            let stale: Vec<String> = self
                .caches
                .keys()
                .await?
                .into_iter()
                .filter(|name| !self.names.is_current(name))
                .collect();

            future::try_join_all(stale.iter().map(|name| self.caches.delete(name))).await?;
            if !stale.is_empty() {
                info!(deleted = ?stale, "removed stale partitions");
            }

            self.clients.claim().await.map_err(WorkerError::Clients)?;
            self.transition(WorkerState::Activated)?;
            Ok(stale)
        }
        .instrument(span)
        .await
    }

    /// Handle a message posted by a page. Returns whether it was recognized.
    pub async fn handle_message(&self, data: &serde_json::Value) -> bool {
        match ControlMessage::parse(data) {
            Some(ControlMessage::SkipWaiting) => {
                debug!("skip waiting requested by page");
                self.clients.skip_waiting().await;
                true
            }
            None => false,
        }
    }

    /// Mark this version as replaced by a newer one.
    pub fn mark_redundant(&self) -> Result<(), WorkerError> {
        self.transition(WorkerState::Redundant)
    }

    /// Handle a fetch event.
    ///
    /// Never fails: network and storage errors degrade to cached fallbacks or
    /// to an empty answer.
    pub async fn handle_fetch(&self, request: Request) -> FetchOutcome {
        if !self.state().is_active() {
            debug!(state = %self.state(), "worker not active, passing through");
            return FetchOutcome::pass_through();
        }

        let Some(strategy) = Strategy::for_request(&request, &self.scope.origin()) else {
            return FetchOutcome::pass_through();
        };

        let span = tracing::debug_span!(
            "fetch",
            strategy = strategy.as_str(),
            url = %request.url(),
            source = tracing::field::Empty
        );
        async {
            let outcome = match strategy {
                Strategy::NetworkFirst => self.network_first(request).await,
                Strategy::StaleWhileRevalidate => self.stale_while_revalidate(request).await,
                Strategy::NetworkOnly => self.network_only(request).await,
            };
            tracing::Span::current()
                .record("source", tracing::field::display(outcome.source()));
            outcome
        }
        .instrument(span)
        .await
    }

    async fn network_first(&self, request: Request) -> FetchOutcome {
        match self.fetcher.fetch(&request, FetchOptions::no_store()).await {
            Ok(fresh) => {
                self.store_runtime(&request, fresh.clone()).await;
                FetchOutcome::respond(
                    Strategy::NetworkFirst,
                    ResponseSource::Network,
                    Some(fresh),
                )
            }
            Err(error) => {
                debug!(%error, "navigation fetch failed, falling back to cache");
                let offline_document = Request::get(self.offline_document.clone());
                let (response, source) = FallbackChain::new()
                    .then(
                        ResponseSource::Cache,
                        self.match_any(&request, MatchOptions::new().ignore_search()),
                    )
                    .then(
                        ResponseSource::Fallback,
                        self.match_any(&offline_document, MatchOptions::new()),
                    )
                    .resolve()
                    .await;
                FetchOutcome::respond(Strategy::NetworkFirst, source, response)
            }
        }
    }

    async fn stale_while_revalidate(&self, request: Request) -> FetchOutcome {
        let runtime = match self.caches.open(&self.names.runtime_cache).await {
            Ok(runtime) => runtime,
            Err(error) => {
                debug!(%error, "runtime partition unavailable");
                return self.network_only(request).await;
            }
        };

        let cached = match runtime.match_request(&request, MatchOptions::new()).await {
            Ok(cached) => cached,
            Err(error) => {
                debug!(%error, "runtime lookup failed");
                None
            }
        };

        let refresh = revalidate(
            runtime,
            Arc::clone(&self.fetcher),
            request,
            self.config.revalidate_status(),
        )
        .in_current_span()
        .boxed()
        .shared();

        // cached, then network, then cached again.
        let (response, source) = FallbackChain::new()
            .then(ResponseSource::Cache, future::ready(cached.clone()))
            .then(ResponseSource::Network, refresh.clone())
            .then(ResponseSource::Cache, future::ready(cached))
            .resolve()
            .await;

        let background = refresh
            .peek()
            .is_none()
            .then(|| refresh.map(|_| ()).boxed());

        FetchOutcome::respond(Strategy::StaleWhileRevalidate, source, response)
            .with_background(background)
    }

    async fn network_only(&self, request: Request) -> FetchOutcome {
        match self.fetcher.fetch(&request, FetchOptions::new()).await {
            Ok(response) => FetchOutcome::respond(
                Strategy::NetworkOnly,
                ResponseSource::Network,
                Some(response),
            ),
            Err(error) => {
                debug!(%error, "fetch failed, trying any cached copy");
                let (response, source) = FallbackChain::new()
                    .then(
                        ResponseSource::Cache,
                        self.match_any(&request, MatchOptions::new()),
                    )
                    .resolve()
                    .await;
                FetchOutcome::respond(Strategy::NetworkOnly, source, response)
            }
        }
    }

    async fn match_any(&self, request: &Request, options: MatchOptions) -> Option<Response> {
        match self.caches.match_request(request, options).await {
            Ok(hit) => hit,
            Err(error) => {
                debug!(%error, url = %request.url(), "cache lookup failed");
                None
            }
        }
    }

    async fn store_runtime(&self, request: &Request, response: Response) {
        let result = match self.caches.open(&self.names.runtime_cache).await {
            Ok(runtime) => runtime.put(request, response).await,
            Err(error) => Err(error),
        };
        if let Err(error) = result {
            debug!(%error, url = %request.url(), "runtime write failed");
        }
    }

    fn transition(&self, to: WorkerState) -> Result<(), WorkerError> {
        let from = {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            let from = *state;
            if !from.can_transition_to(to) {
                return Err(WorkerError::InvalidTransition { from, to });
            }
            *state = to;
            from
        };

        info!(%from, %to, version = %self.config.version, "worker state changed");
        for observer in &self.observers {
            observer.on_transition(from, to);
        }
        Ok(())
    }
}

/// Fetch a fresh copy and write it back when its status is cacheable.
async fn revalidate(
    runtime: Arc<dyn CachePartition>,
    fetcher: Arc<dyn Fetcher>,
    request: Request,
    cacheable: StatusCode,
) -> Option<Response> {
    match fetcher.fetch(&request, FetchOptions::new()).await {
        Ok(response) => {
            if response.status() == cacheable {
                if let Err(error) = runtime.put(&request, response.clone()).await {
                    debug!(%error, "revalidation write failed");
                }
            }
            Some(response)
        }
        Err(error) => {
            debug!(%error, url = %request.url(), "revalidation failed");
            None
        }
    }
}
