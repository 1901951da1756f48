//! Request interceptor serving an application shell offline.
//!
//! This crate wires the host primitives together:
//! - `OfflineWorker` - Install, activate, fetch and message handlers
//! - `Strategy` - Per-request caching strategy
//! - `FallbackChain` - Ordered fallback attempts
//! - `FetchOutcome` - What the host should answer, plus background work
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use offline_worker::prelude::*;
//!
//! let worker = OfflineWorker::new(
//!     WorkerConfig::new("v6"),
//!     Scope::parse("https://user.github.io/chat/")?,
//!     Arc::new(MemoryCacheStorage::new()),
//!     fetcher,
//!     clients,
//! )?;
//!
//! worker.install().await?;
//! worker.activate().await?;
//!
//! let outcome = worker.handle_fetch(request).await;
//! ```

mod error;
mod fallback;
mod host;
mod message;
mod outcome;
mod strategy;
mod worker;

pub use error::*;
pub use fallback::*;
pub use host::*;
pub use message::*;
pub use outcome::*;
pub use strategy::*;
pub use worker::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Clients, FetchOutcome, OfflineWorker, ResponseSource, Strategy, WorkerError};
    pub use offline_cache::{CacheStorage, MatchOptions, MemoryCacheStorage};
    pub use offline_core::{Request, Response, Scope, WorkerConfig, WorkerState};
    pub use offline_fetch::{FetchOptions, Fetcher};
}
