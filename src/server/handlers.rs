//! Blog API request handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{Method, StatusCode, Uri},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::content::{
    validate_draft, validate_patch, BlogPost, PostDraft, PostId, PostPatch, ValidationErrors,
};

/// Optional list filters, matched the same way as the client filter
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub keyword: Option<String>,
}

/// GET /api/blog - All posts, newest first
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<BlogPost>>> {
    let posts = state.store.find_all().await.map_err(|e| state.error(e))?;

    let category = query.category.unwrap_or_default();
    let keyword = query.keyword.unwrap_or_default();
    let posts: Vec<BlogPost> = posts
        .into_iter()
        .filter(|p| p.matches_category(&category) && p.matches_search(&keyword))
        .collect();

    tracing::debug!("Listing {} posts", posts.len());
    Ok(Json(posts))
}

/// GET /api/blog/:id
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<BlogPost>> {
    let post = state
        .store
        .find_by_id(&PostId::from(id))
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(post))
}

/// POST /api/blog
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PostDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BlogPost>)> {
    let Json(draft) = payload.map_err(reject_body)?;

    // Reject before the store sees anything
    validate_draft(&draft, &state.organization)?;

    let post = state.store.insert(draft).await.map_err(|e| state.error(e))?;
    tracing::info!("Created post {} ({:?})", post.id, post.title);
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/blog/:id
///
/// An unknown id is a 404 whatever the body contains.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> ApiResult<Json<BlogPost>> {
    let id = PostId::from(id);
    state
        .store
        .find_by_id(&id)
        .await
        .map_err(|e| state.error(e))?;

    let Json(patch) = payload.map_err(reject_body)?;
    let patch = validate_patch(&patch)?;

    let post = state
        .store
        .update_by_id(&id, patch)
        .await
        .map_err(|e| state.error(e))?;
    tracing::info!("Updated post {}", post.id);
    Ok(Json(post))
}

/// DELETE /api/blog/:id
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = PostId::from(id);
    state
        .store
        .delete_by_id(&id)
        .await
        .map_err(|e| state.error(e))?;
    tracing::info!("Deleted post {}", id);
    Ok(Json(json!({ "message": "Blog post deleted successfully" })))
}

/// GET /api/health - Liveness probe
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.environment.as_str(),
    }))
}

/// GET / - API summary
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": format!("{} API Server", state.title),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "blog": "/api/blog",
        },
    }))
}

/// Any unmatched route
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// A known route hit with a method it does not serve
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(ValidationErrors::body(rejection.body_text()))
}
