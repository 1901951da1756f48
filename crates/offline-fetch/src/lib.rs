//! Network fetch abstraction for the offline shell worker.
//!
//! This crate provides:
//! - `Fetcher` - Host network access
//! - `FetchOptions` / `CacheMode` - Per-request cache directives
//! - `FetchError` - Network failure taxonomy
//! - `MockFetcher` - Scripted network for tests and local hosts

mod client;
mod mock;

pub use client::*;
pub use mock::*;
