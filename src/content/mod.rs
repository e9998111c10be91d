//! Content module - blog post model and field validation

mod post;
mod validate;

pub use post::{BlogPost, PostDraft, PostId, PostPatch, DEFAULT_AUTHOR, TITLE_MAX_LEN};
pub use validate::{validate_draft, validate_patch, FieldError, NewPost, ValidationErrors};
