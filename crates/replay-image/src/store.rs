//! Content stores

use crate::error::ImageError;
use async_trait::async_trait;
use dashmap::DashMap;
use replay_core::ContentId;
use std::sync::Arc;

/// Async lookup of byte buffers by content id
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the bytes stored under `id`
    ///
    /// # Errors
    /// Returns [`ImageError::NotFound`] for unknown ids, or
    /// [`ImageError::Store`] if the backend fails.
    async fn resolve(&self, id: &ContentId) -> Result<Arc<[u8]>, ImageError>;
}

#[async_trait]
impl<S: ContentStore + ?Sized> ContentStore for Arc<S> {
    async fn resolve(&self, id: &ContentId) -> Result<Arc<[u8]>, ImageError> {
        (**self).resolve(id).await
    }
}

/// In-memory content-addressed store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<ContentId, Arc<[u8]>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data`, returning its content id
    ///
    /// Inserting the same bytes twice yields the same id and one entry.
    pub fn insert(&self, data: impl Into<Arc<[u8]>>) -> ContentId {
        let data = data.into();
        let id = ContentId::of(&data);
        self.entries.entry(id).or_insert(data);
        id
    }

    /// Remove an entry
    pub fn remove(&self, id: &ContentId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Number of stored buffers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn resolve(&self, id: &ContentId) -> Result<Arc<[u8]>, ImageError> {
        self.entries
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(ImageError::NotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_and_resolve() {
        let store = MemoryStore::new();
        let id = store.insert(vec![1u8, 2, 3]);
        assert_eq!(id, ContentId::of(&[1, 2, 3]));
        assert_eq!(&*store.resolve(&id).await.unwrap(), &[1, 2, 3]);

        assert_eq!(store.insert(vec![1u8, 2, 3]), id);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_id() {
        let store = MemoryStore::new();
        let id = ContentId::of(b"absent");
        assert_eq!(store.resolve(&id).await, Err(ImageError::NotFound(id)));

        let id = store.insert(vec![0u8]);
        assert!(store.remove(&id));
        assert!(store.is_empty());
    }
}
