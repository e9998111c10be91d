//! Content store - the document collection holding blog posts
//!
//! The store owns schema validation and timestamps. Both implementations
//! share [`Collection`] for the document semantics and differ only in
//! whether the collection is written to disk after each mutation.

mod clock;
mod collection;
mod error;
mod file;
mod memory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::Collection;
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::content::{BlogPost, PostDraft, PostId, PostPatch};

/// Document store for blog posts.
///
/// Every operation is atomic for a single document. There are no
/// cross-document transactions.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Validate and insert a draft, assigning identity and timestamps
    async fn insert(&self, draft: PostDraft) -> Result<BlogPost, StoreError>;

    /// All posts, newest `created_at` first
    async fn find_all(&self) -> Result<Vec<BlogPost>, StoreError>;

    async fn find_by_id(&self, id: &PostId) -> Result<BlogPost, StoreError>;

    /// Apply a patch to the content fields. Validation is re-applied and
    /// nothing is written if it fails.
    async fn update_by_id(&self, id: &PostId, patch: PostPatch) -> Result<BlogPost, StoreError>;

    async fn delete_by_id(&self, id: &PostId) -> Result<(), StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Remove every post
    async fn clear(&self) -> Result<(), StoreError>;
}
