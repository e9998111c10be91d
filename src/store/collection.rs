//! In-memory document collection shared by the store implementations

use chrono::{DateTime, Duration, Utc};

use super::{Clock, StoreError};
use crate::content::{validate_draft, validate_patch, BlogPost, PostDraft, PostId, PostPatch};

/// Posts in insertion order plus the last timestamp handed out.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    posts: Vec<BlogPost>,
    last_stamp: Option<DateTime<Utc>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a collection from persisted posts (stored oldest first)
    pub fn from_posts(posts: Vec<BlogPost>) -> Self {
        let last_stamp = posts.iter().map(|p| p.updated_at).max();
        Self { posts, last_stamp }
    }

    /// Posts in insertion order
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn insert(
        &mut self,
        draft: &PostDraft,
        default_author: &str,
        clock: &dyn Clock,
    ) -> Result<BlogPost, StoreError> {
        let new_post = validate_draft(draft, default_author)?;
        let now = self.stamp(clock);

        let mut id = PostId::generate();
        while self.position(&id).is_some() {
            id = PostId::generate();
        }

        let post = BlogPost {
            id,
            title: new_post.title,
            content: new_post.content,
            category: new_post.category,
            author: new_post.author,
            created_at: now,
            updated_at: now,
        };
        self.posts.push(post.clone());
        Ok(post)
    }

    /// All posts sorted by creation time, newest first. Ties keep the
    /// most recently inserted post first.
    pub fn sorted(&self) -> Vec<BlogPost> {
        let mut posts: Vec<BlogPost> = self.posts.iter().rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    pub fn get(&self, id: &PostId) -> Result<BlogPost, StoreError> {
        self.position(id)
            .map(|i| self.posts[i].clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    pub fn update(
        &mut self,
        id: &PostId,
        patch: &PostPatch,
        clock: &dyn Clock,
    ) -> Result<BlogPost, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let patch = validate_patch(patch)?;
        let now = self.stamp(clock);

        let post = &mut self.posts[index];
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(category) = patch.category {
            post.category = category;
        }
        if let Some(author) = patch.author {
            post.author = author;
        }
        post.updated_at = now.max(post.created_at);
        Ok(post.clone())
    }

    pub fn remove(&mut self, id: &PostId) -> Result<BlogPost, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(self.posts.remove(index))
    }

    pub fn clear(&mut self) {
        self.posts.clear();
    }

    fn position(&self, id: &PostId) -> Option<usize> {
        self.posts.iter().position(|p| &p.id == id)
    }

    /// Next timestamp, strictly after every timestamp issued so far
    fn stamp(&mut self, clock: &dyn Clock) -> DateTime<Utc> {
        let now = clock.now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}
