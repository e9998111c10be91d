//! Store persisted as a single JSON document on disk

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Clock, Collection, ContentStore, StoreError, SystemClock};
use crate::content::{BlogPost, PostDraft, PostId, PostPatch, DEFAULT_AUTHOR};

/// On-disk layout of the collection
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    /// Posts in insertion order
    posts: Vec<BlogPost>,
}

impl StoreFile {
    /// Current file format version
    const VERSION: u32 = 1;
}

/// Keeps the collection in memory and rewrites the file after every
/// mutation. A mutation whose write fails is rolled back.
pub struct JsonFileStore {
    path: PathBuf,
    inner: RwLock<Collection>,
    clock: Arc<dyn Clock>,
    default_author: String,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty collection if the
    /// file does not exist yet
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with_clock(path, Arc::new(SystemClock)).await
    }

    pub async fn open_with_clock<P: AsRef<Path>>(
        path: P,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let collection = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let file: StoreFile = serde_json::from_str(&content)?;
                if file.version != StoreFile::VERSION {
                    return Err(StoreError::Version(file.version));
                }
                tracing::debug!("Loaded {} posts from {:?}", file.posts.len(), path);
                Collection::from_posts(file.posts)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No store file at {:?}, starting empty", path);
                Collection::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            inner: RwLock::new(collection),
            clock,
            default_author: DEFAULT_AUTHOR.to_string(),
        })
    }

    /// Author assigned to drafts that do not name one
    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the collection through a temp file and rename it into place
    async fn save(&self, col: &Collection) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        let file = StoreFile {
            version: StoreFile::VERSION,
            posts: col.posts().to_vec(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `op` to a copy of the collection, persist it, then swap it in
    async fn mutate<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Collection) -> Result<T, StoreError>,
    {
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        let value = op(&mut next)?;
        if let Err(e) = self.save(&next).await {
            tracing::error!("Failed to persist store to {:?}: {}", self.path, e);
            return Err(e);
        }
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl ContentStore for JsonFileStore {
    async fn insert(&self, draft: PostDraft) -> Result<BlogPost, StoreError> {
        let clock = self.clock.clone();
        let author = self.default_author.clone();
        self.mutate(move |col| col.insert(&draft, &author, clock.as_ref()))
            .await
    }

    async fn find_all(&self) -> Result<Vec<BlogPost>, StoreError> {
        Ok(self.inner.read().await.sorted())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<BlogPost, StoreError> {
        self.inner.read().await.get(id)
    }

    async fn update_by_id(&self, id: &PostId, patch: PostPatch) -> Result<BlogPost, StoreError> {
        let clock = self.clock.clone();
        self.mutate(move |col| col.update(id, &patch, clock.as_ref()))
            .await
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), StoreError> {
        self.mutate(|col| col.remove(id).map(|_| ())).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.len())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.mutate(|col| {
            col.clear();
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_posts_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("blog.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        let post = store.insert(PostDraft::new("A", "B", "C")).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        assert_eq!(reopened.find_by_id(&post.id).await.unwrap(), post);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("blog.json"))
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_rejected_insert_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blog.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        let err = store.insert(PostDraft::new("", "B", "C")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_delete_and_clear_are_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blog.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        let a = store.insert(PostDraft::new("A", "x", "c")).await.unwrap();
        store.insert(PostDraft::new("B", "x", "c")).await.unwrap();

        store.delete_by_id(&a.id).await.unwrap();
        assert_eq!(JsonFileStore::open(&path).await.unwrap().count().await.unwrap(), 1);

        store.clear().await.unwrap();
        assert_eq!(JsonFileStore::open(&path).await.unwrap().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blog.json");
        tokio::fs::write(&path, r#"{"version": 99, "posts": []}"#)
            .await
            .unwrap();
        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::Version(99))
        ));
    }
}
