//! Volatile store, used by tests and `server --memory`

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Clock, Collection, ContentStore, StoreError, SystemClock};
use crate::content::{BlogPost, PostDraft, PostId, PostPatch, DEFAULT_AUTHOR};

pub struct MemoryStore {
    inner: RwLock<Collection>,
    clock: Arc<dyn Clock>,
    default_author: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Collection::new()),
            clock,
            default_author: DEFAULT_AUTHOR.to_string(),
        }
    }

    /// Author assigned to drafts that do not name one
    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn insert(&self, draft: PostDraft) -> Result<BlogPost, StoreError> {
        let mut col = self.inner.write().await;
        col.insert(&draft, &self.default_author, self.clock.as_ref())
    }

    async fn find_all(&self) -> Result<Vec<BlogPost>, StoreError> {
        Ok(self.inner.read().await.sorted())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<BlogPost, StoreError> {
        self.inner.read().await.get(id)
    }

    async fn update_by_id(&self, id: &PostId, patch: PostPatch) -> Result<BlogPost, StoreError> {
        let mut col = self.inner.write().await;
        col.update(id, &patch, self.clock.as_ref())
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), StoreError> {
        self.inner.write().await.remove(id).map(|_| ())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.len())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.write().await.clear();
        Ok(())
    }
}
