//! Cached resize resolution using moka

use crate::error::ImageError;
use crate::request::ResizeRequest;
use crate::store::ContentStore;
use moka::future::Cache;
use replay_core::ContentId;
use std::sync::Arc;

/// Cache statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverStats {
    /// Entries currently cached
    pub entry_count: u64,
}

/// Resolves [`ResizeRequest`]s against a store
///
/// Results are cached by the request's content id, so identical requests
/// resize once.
#[derive(Debug)]
pub struct ResizeResolver<S> {
    store: S,
    cache: Cache<ContentId, Arc<[u8]>>,
}

impl<S: ContentStore> ResizeResolver<S> {
    /// Create a resolver caching up to `max_capacity` results
    #[must_use]
    pub fn new(store: S, max_capacity: u64) -> Self {
        Self {
            store,
            cache: Cache::new(max_capacity),
        }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a request, serving repeated requests from the cache
    ///
    /// Failures are not cached.
    ///
    /// # Errors
    /// Propagates [`ResizeRequest::resolve`] errors.
    pub async fn resolve(&self, request: &ResizeRequest) -> Result<Arc<[u8]>, ImageError> {
        let key = request.id()?;
        if let Some(cached) = self.cache.get(&key).await {
            tracing::trace!(request = %key.short(), "resize cache hit");
            return Ok(cached);
        }

        let resized: Arc<[u8]> = request.resolve(&self.store).await?.into();
        self.cache.insert(key, Arc::clone(&resized)).await;
        Ok(resized)
    }

    /// Drop the cached result of a request
    ///
    /// # Errors
    /// Returns [`ImageError::Hash`] if the request cannot be hashed.
    pub async fn invalidate(&self, request: &ResizeRequest) -> Result<(), ImageError> {
        self.cache.invalidate(&request.id()?).await;
        Ok(())
    }

    /// Whether a request's result is cached
    ///
    /// # Errors
    /// Returns [`ImageError::Hash`] if the request cannot be hashed.
    pub async fn is_cached(&self, request: &ResizeRequest) -> Result<bool, ImageError> {
        Ok(self.cache.get(&request.id()?).await.is_some())
    }

    /// Cache statistics
    ///
    /// Applies pending cache maintenance first, so counts reflect every
    /// completed insert and invalidation.
    pub async fn stats(&self) -> ResolverStats {
        self.cache.run_pending_tasks().await;
        ResolverStats {
            entry_count: self.cache.entry_count(),
        }
    }
}
