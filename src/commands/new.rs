//! Create a new post

use anyhow::Result;

use crate::content::{BlogPost, PostDraft};
use crate::store::ContentStore;

/// Insert a post straight into the store
pub async fn create_post(
    store: &dyn ContentStore,
    title: &str,
    category: &str,
    content: &str,
    author: Option<&str>,
) -> Result<BlogPost> {
    let mut draft = PostDraft::new(title, content, category);
    if let Some(author) = author {
        draft = draft.with_author(author);
    }

    let post = store.insert(draft).await?;
    println!("Created: {} ({})", post.title, post.id);

    Ok(post)
}
