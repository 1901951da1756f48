//! Named cache partitions for the offline shell worker.
//!
//! This crate provides:
//! - `CacheStorage` - Host storage holding named partitions
//! - `CachePartition` - One request→response store
//! - `MatchOptions` - Lookup options (`ignore_search`, `ignore_method`)
//! - `MemoryCacheStorage` - In-process storage for tests and native hosts
//!
//! # Example
//!
//! ```ignore
//! use offline_cache::{CacheStorage, MatchOptions, MemoryCacheStorage};
//!
//! let caches = MemoryCacheStorage::new();
//! let runtime = caches.open("chat-runtime-v5").await?;
//! runtime.put(&request, response).await?;
//!
//! let hit = caches
//!     .match_request(&request, MatchOptions::new().ignore_search())
//!     .await?;
//! ```

mod error;
mod key;
mod memory;
mod storage;

pub use error::*;
pub use key::*;
pub use memory::*;
pub use storage::*;
