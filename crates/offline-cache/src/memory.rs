//! In-process cache storage.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use offline_core::{Request, Response};

use crate::error::{CacheError, CacheResult};
use crate::key::{request_matches, MatchOptions};
use crate::storage::{CachePartition, CacheStorage};

/// In-memory partition.
#[derive(Debug, Default)]
pub struct MemoryPartition {
    entries: RwLock<Vec<(Request, Response)>>,
}

impl MemoryPartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn ensure_storable(request: &Request) -> CacheResult<()> {
    if request.is_get() {
        Ok(())
    } else {
        Err(CacheError::UnsupportedMethod {
            method: request.method().to_string(),
            url: request.url().to_string(),
        })
    }
}

fn upsert(entries: &mut Vec<(Request, Response)>, request: Request, response: Response) {
    entries.retain(|(stored, _)| !request_matches(stored, &request, MatchOptions::new()));
    entries.push((request, response));
}

#[async_trait]
impl CachePartition for MemoryPartition {
    async fn match_request(
        &self,
        request: &Request,
        options: MatchOptions,
    ) -> CacheResult<Option<Response>> {
        let entries = self.entries.read().map_err(|_| CacheError::poisoned())?;
        Ok(entries
            .iter()
            .find(|(stored, _)| request_matches(stored, request, options))
            .map(|(_, response)| response.clone()))
    }

    async fn put(&self, request: &Request, response: Response) -> CacheResult<()> {
        ensure_storable(request)?;
        let mut entries = self.entries.write().map_err(|_| CacheError::poisoned())?;
        upsert(&mut entries, request.clone(), response);
        Ok(())
    }

    async fn put_all(&self, batch: Vec<(Request, Response)>) -> CacheResult<()> {
        for (request, _) in &batch {
            ensure_storable(request)?;
        }
        let mut entries = self.entries.write().map_err(|_| CacheError::poisoned())?;
        for (request, response) in batch {
            upsert(&mut entries, request, response);
        }
        Ok(())
    }

    async fn delete(&self, request: &Request, options: MatchOptions) -> CacheResult<bool> {
        let mut entries = self.entries.write().map_err(|_| CacheError::poisoned())?;
        let before = entries.len();
        entries.retain(|(stored, _)| !request_matches(stored, request, options));
        Ok(entries.len() != before)
    }

    async fn keys(&self) -> CacheResult<Vec<Request>> {
        let entries = self.entries.read().map_err(|_| CacheError::poisoned())?;
        Ok(entries.iter().map(|(request, _)| request.clone()).collect())
    }
}

/// In-memory cache storage.
///
/// Partitions are kept in creation order so storage-wide lookups behave like
/// the browser's `caches.match`.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    partitions: RwLock<Vec<(String, Arc<MemoryPartition>)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a partition without creating it.
    pub fn partition(&self, name: &str) -> Option<Arc<MemoryPartition>> {
        self.partitions.read().ok().and_then(|partitions| {
            partitions
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, p)| Arc::clone(p))
        })
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> CacheResult<Arc<dyn CachePartition>> {
        let mut partitions = self.partitions.write().map_err(|_| CacheError::poisoned())?;
        if let Some((_, partition)) = partitions.iter().find(|(n, _)| n == name) {
            return Ok(Arc::clone(partition) as Arc<dyn CachePartition>);
        }

        tracing::trace!(partition = name, "creating cache partition");
        let partition = Arc::new(MemoryPartition::new());
        partitions.push((name.to_string(), Arc::clone(&partition)));
        Ok(partition as Arc<dyn CachePartition>)
    }

    async fn get(&self, name: &str) -> CacheResult<Option<Arc<dyn CachePartition>>> {
        let partitions = self.partitions.read().map_err(|_| CacheError::poisoned())?;
        Ok(partitions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| Arc::clone(p) as Arc<dyn CachePartition>))
    }

    async fn has(&self, name: &str) -> CacheResult<bool> {
        let partitions = self.partitions.read().map_err(|_| CacheError::poisoned())?;
        Ok(partitions.iter().any(|(n, _)| n == name))
    }

    async fn delete(&self, name: &str) -> CacheResult<bool> {
        let mut partitions = self.partitions.write().map_err(|_| CacheError::poisoned())?;
        let before = partitions.len();
        partitions.retain(|(n, _)| n != name);
        Ok(partitions.len() != before)
    }

    async fn keys(&self) -> CacheResult<Vec<String>> {
        let partitions = self.partitions.read().map_err(|_| CacheError::poisoned())?;
        Ok(partitions.iter().map(|(n, _)| n.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn get(url: &str) -> Request {
        Request::parse(Method::GET, url).unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_once() {
        let caches = MemoryCacheStorage::new();
        caches.open("chat-static-v5").await.unwrap();
        caches.open("chat-static-v5").await.unwrap();
        caches.open("chat-runtime-v5").await.unwrap();

        assert_eq!(
            caches.keys().await.unwrap(),
            vec!["chat-static-v5", "chat-runtime-v5"]
        );
        assert!(caches.has("chat-runtime-v5").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let caches = MemoryCacheStorage::new();
        assert!(caches.get("chat-static-v5").await.unwrap().is_none());
        assert!(!caches.has("chat-static-v5").await.unwrap());

        caches.open("chat-static-v5").await.unwrap();
        assert!(caches.get("chat-static-v5").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let caches = MemoryCacheStorage::new();
        let partition = caches.open("runtime").await.unwrap();
        let req = get("https://app.example/app.js");

        partition.put(&req, Response::ok("old")).await.unwrap();
        partition.put(&req, Response::ok("new")).await.unwrap();

        let hit = partition
            .match_request(&req, MatchOptions::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.text(), Some("new"));
        assert_eq!(caches.partition("runtime").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_put_rejects_post() {
        let partition = MemoryPartition::new();
        let req = Request::parse(Method::POST, "https://app.example/api").unwrap();

        let err = partition.put(&req, Response::ok("x")).await.unwrap_err();
        assert!(matches!(err, CacheError::UnsupportedMethod { .. }));
        assert!(partition.is_empty());
    }

    #[tokio::test]
    async fn test_put_all_is_all_or_nothing() {
        let partition = MemoryPartition::new();
        let batch = vec![
            (get("https://app.example/a"), Response::ok("a")),
            (
                Request::parse(Method::PUT, "https://app.example/b").unwrap(),
                Response::ok("b"),
            ),
        ];

        assert!(partition.put_all(batch).await.is_err());
        assert!(partition.is_empty());

        let batch = vec![
            (get("https://app.example/a"), Response::ok("a")),
            (get("https://app.example/b"), Response::ok("b")),
        ];
        partition.put_all(batch).await.unwrap();
        assert_eq!(partition.keys().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_entry_and_partition() {
        let caches = MemoryCacheStorage::new();
        let partition = caches.open("old").await.unwrap();
        let req = get("https://app.example/a?x=1");
        partition.put(&req, Response::ok("a")).await.unwrap();

        let bare = get("https://app.example/a");
        assert!(!partition.delete(&bare, MatchOptions::new()).await.unwrap());
        assert!(partition
            .delete(&bare, MatchOptions::new().ignore_search())
            .await
            .unwrap());

        assert!(caches.delete("old").await.unwrap());
        assert!(!caches.delete("old").await.unwrap());
        assert!(caches.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_wide_match_uses_creation_order() {
        let caches = MemoryCacheStorage::new();
        let first = caches.open("first").await.unwrap();
        let second = caches.open("second").await.unwrap();
        let req = get("https://app.example/index.html");

        second.put(&req, Response::ok("second")).await.unwrap();
        first.put(&req, Response::ok("first")).await.unwrap();

        let hit = caches
            .match_request(&req, MatchOptions::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.text(), Some("first"));

        let miss = caches
            .match_request(&get("https://app.example/other"), MatchOptions::new())
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    /// Deletes `old` right after listing partition names, the way a
    /// concurrent activation can.
    struct DeletesAfterListing(MemoryCacheStorage);

    #[async_trait]
    impl CacheStorage for DeletesAfterListing {
        async fn open(&self, name: &str) -> CacheResult<Arc<dyn CachePartition>> {
            self.0.open(name).await
        }

        async fn get(&self, name: &str) -> CacheResult<Option<Arc<dyn CachePartition>>> {
            self.0.get(name).await
        }

        async fn has(&self, name: &str) -> CacheResult<bool> {
            self.0.has(name).await
        }

        async fn delete(&self, name: &str) -> CacheResult<bool> {
            self.0.delete(name).await
        }

        async fn keys(&self) -> CacheResult<Vec<String>> {
            let names = self.0.keys().await?;
            self.0.delete("old").await?;
            Ok(names)
        }
    }

    #[tokio::test]
    async fn test_storage_wide_match_skips_deleted_partition() {
        let inner = MemoryCacheStorage::new();
        inner.open("old").await.unwrap();
        let current = inner.open("current").await.unwrap();
        let req = get("https://app.example/app.js");
        current.put(&req, Response::ok("current")).await.unwrap();

        let caches = DeletesAfterListing(inner);
        let hit = caches
            .match_request(&req, MatchOptions::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(hit.text(), Some("current"));
        assert!(!caches.0.has("old").await.unwrap());
        assert_eq!(caches.0.keys().await.unwrap(), vec!["current"]);
    }
}
