//! Host storage traits.

use std::sync::Arc;

use async_trait::async_trait;
use offline_core::{Request, Response};

use crate::error::CacheResult;
use crate::key::MatchOptions;

/// One named request→response store.
///
/// Each operation is atomic on its own; there is no transaction spanning
/// several calls, so concurrent writes to one key are last-write-wins.
#[async_trait]
pub trait CachePartition: Send + Sync {
    /// First stored response whose request matches.
    async fn match_request(
        &self,
        request: &Request,
        options: MatchOptions,
    ) -> CacheResult<Option<Response>>;

    /// Store a response, replacing any entry for the same request.
    async fn put(&self, request: &Request, response: Response) -> CacheResult<()>;

    /// Store a batch of responses. Either every entry is written or none is.
    async fn put_all(&self, entries: Vec<(Request, Response)>) -> CacheResult<()>;

    /// Remove matching entries. Returns whether anything was removed.
    async fn delete(&self, request: &Request, options: MatchOptions) -> CacheResult<bool>;

    /// Requests currently stored, in insertion order.
    async fn keys(&self) -> CacheResult<Vec<Request>>;
}

/// Storage holding every named partition of an origin.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a partition, creating it when it does not exist.
    async fn open(&self, name: &str) -> CacheResult<Arc<dyn CachePartition>>;

    /// Get an existing partition without creating it.
    async fn get(&self, name: &str) -> CacheResult<Option<Arc<dyn CachePartition>>>;

    /// Whether a partition exists.
    async fn has(&self, name: &str) -> CacheResult<bool>;

    /// Delete a partition. Returns whether it existed.
    async fn delete(&self, name: &str) -> CacheResult<bool>;

    /// Names of all partitions, in creation order.
    async fn keys(&self) -> CacheResult<Vec<String>>;

    /// Look a request up across every partition, in creation order.
    ///
    /// Partitions deleted after the names were listed are skipped, never
    /// re-created.
    async fn match_request(
        &self,
        request: &Request,
        options: MatchOptions,
    ) -> CacheResult<Option<Response>> {
        for name in self.keys().await? {
            let Some(partition) = self.get(&name).await? else {
                continue;
            };
            if let Some(response) = partition.match_request(request, options).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}
