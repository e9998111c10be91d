use thiserror::Error;

use crate::content::{PostId, ValidationErrors};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("blog post not found: {0}")]
    NotFound(PostId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported store format version {0}")]
    Version(u32),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
