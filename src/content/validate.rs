//! Field validation for create and update requests

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::post::{PostDraft, PostPatch, TITLE_MAX_LEN};

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// All field errors found in one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_messages(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// A single error not tied to a post field (e.g. a malformed body)
    pub fn body(message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new("body", message)],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A draft that passed validation, with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
}

/// Validate a create request.
///
/// Title and category are trimmed, content is kept verbatim. A missing
/// or blank author falls back to `default_author`.
pub fn validate_draft(draft: &PostDraft, default_author: &str) -> Result<NewPost, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = required(&mut errors, "title", draft.title.as_deref());
    let content = required(&mut errors, "content", draft.content.as_deref());
    let category = required(&mut errors, "category", draft.category.as_deref());

    if let Some(title) = &title {
        check_title_length(&mut errors, title);
    }

    let author = draft
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(default_author)
        .to_string();

    match (title, content, category) {
        (Some(title), Some(content), Some(category)) if errors.is_empty() => Ok(NewPost {
            title: title.trim().to_string(),
            content,
            category: category.trim().to_string(),
            author,
        }),
        _ => Err(errors),
    }
}

/// Validate an update request.
///
/// Only fields present in the patch are checked; present fields obey
/// the same rules as on create. Returns the normalized patch.
pub fn validate_patch(patch: &PostPatch) -> Result<PostPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut normalized = PostPatch::default();

    if let Some(title) = &patch.title {
        if not_blank(&mut errors, "title", title) {
            check_title_length(&mut errors, title);
            normalized.title = Some(title.trim().to_string());
        }
    }
    if let Some(content) = &patch.content {
        if not_blank(&mut errors, "content", content) {
            normalized.content = Some(content.clone());
        }
    }
    if let Some(category) = &patch.category {
        if not_blank(&mut errors, "category", category) {
            normalized.category = Some(category.trim().to_string());
        }
    }
    normalized.author = patch
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    errors.into_result(normalized)
}

fn required(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<String> {
    match value {
        None => {
            errors.push(field, format!("{} is required", field));
            None
        }
        Some(v) if not_blank(errors, field, v) => Some(v.to_string()),
        Some(_) => None,
    }
}

fn not_blank(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, format!("{} must not be empty", field));
        false
    } else {
        true
    }
}

fn check_title_length(errors: &mut ValidationErrors, title: &str) {
    if title.trim().chars().count() > TITLE_MAX_LEN {
        errors.push(
            "title",
            format!("title must be at most {} characters", TITLE_MAX_LEN),
        );
    }
}
