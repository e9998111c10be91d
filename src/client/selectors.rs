//! Pure projections over the client state

use crate::content::{BlogPost, PostId};

use super::state::{BlogState, Filter};

/// Posts passing the current filter, in cache order
pub fn visible_posts(state: &BlogState) -> Vec<&BlogPost> {
    apply_filter(state.posts(), state.filter())
}

/// Filter `posts` without reordering them
pub fn apply_filter<'a>(posts: &'a [BlogPost], filter: &Filter) -> Vec<&'a BlogPost> {
    posts
        .iter()
        .filter(|p| p.matches_category(&filter.category) && p.matches_search(&filter.search_term))
        .collect()
}

/// The first `limit` cached posts
pub fn recent_posts(state: &BlogState, limit: usize) -> &[BlogPost] {
    let posts = state.posts();
    &posts[..limit.min(posts.len())]
}

/// Other posts in the same category as `post`, at most `limit`
pub fn related_posts<'a>(state: &'a BlogState, post: &BlogPost, limit: usize) -> Vec<&'a BlogPost> {
    state
        .posts()
        .iter()
        .filter(|p| p.id != post.id && p.category == post.category)
        .take(limit)
        .collect()
}

/// Distinct categories in first-seen order
pub fn categories(state: &BlogState) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for post in state.posts() {
        if !seen.contains(&post.category.as_str()) {
            seen.push(&post.category);
        }
    }
    seen
}

pub fn find_post<'a>(state: &'a BlogState, id: &PostId) -> Option<&'a BlogPost> {
    state.posts().iter().find(|p| &p.id == id)
}
