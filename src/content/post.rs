//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length, in characters
pub const TITLE_MAX_LEN: usize = 100;

/// Author used when a post is created without one
pub const DEFAULT_AUTHOR: &str = "404.js Team";

/// Store-assigned post identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Generate a fresh identity (32 lowercase hex characters)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A stored blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Post identity, immutable once assigned
    #[serde(rename = "_id")]
    pub id: PostId,

    /// Post title (trimmed, at most 100 characters)
    pub title: String,

    /// Post body
    pub content: String,

    /// Free-form category label
    pub category: String,

    /// Author name
    pub author: String,

    /// Creation time, never changes after insert
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Case-insensitive substring match on the category.
    /// An empty needle matches every post.
    pub fn matches_category(&self, category: &str) -> bool {
        category.is_empty() || contains_ignore_case(&self.category, category)
    }

    /// Case-insensitive substring match on title, content or author.
    /// An empty needle matches every post.
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty()
            || contains_ignore_case(&self.title, term)
            || contains_ignore_case(&self.content, term)
            || contains_ignore_case(&self.author, term)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Body of a create request.
///
/// Every field is optional at the wire level so that a missing field
/// surfaces as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl PostDraft {
    /// Draft with the three required fields set
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            category: Some(category.into()),
            author: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Body of an update request. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.author.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> BlogPost {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        BlogPost {
            id: PostId::from("abc123"),
            title: "Designing for Mobile".to_string(),
            content: "Touch targets and typography".to_string(),
            category: "UI Design".to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_generated_ids_are_unique_hex() {
        let a = PostId::generate();
        let b = PostId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_post_wire_shape() {
        let json = serde_json::to_value(sample_post()).unwrap();
        assert_eq!(json["_id"], "abc123");
        assert_eq!(json["author"], "404.js Team");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_matches_category_ignores_case() {
        let post = sample_post();
        assert!(post.matches_category(""));
        assert!(post.matches_category("design"));
        assert!(post.matches_category("UI"));
        assert!(!post.matches_category("Mobile"));
    }

    #[test]
    fn test_matches_search_covers_title_content_author() {
        let post = sample_post();
        assert!(post.matches_search(""));
        assert!(post.matches_search("mobile"));
        assert!(post.matches_search("TYPOGRAPHY"));
        assert!(post.matches_search("404.js"));
        assert!(!post.matches_search("e-commerce"));
    }

    #[test]
    fn test_draft_tolerates_missing_fields() {
        let draft: PostDraft = serde_json::from_str(r#"{"title":"Only a title"}"#).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Only a title"));
        assert!(draft.content.is_none());
    }

    #[test]
    fn test_patch_ignores_identity_fields() {
        let patch: PostPatch =
            serde_json::from_str(r#"{"_id":"other","createdAt":"x","title":"New"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert!(!patch.is_empty());
        assert!(PostPatch::default().is_empty());
    }
}
