//! Blog API server

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Environment, SiteConfig};
use crate::store::{ContentStore, StoreError};
use crate::Site;

/// State shared by every handler
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub environment: Environment,
    /// Default author for drafts without one
    pub organization: String,
    pub title: String,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, config: &SiteConfig) -> Self {
        Self {
            store,
            environment: config.server.environment,
            organization: config.organization.clone(),
            title: config.title.clone(),
        }
    }

    fn error(&self, err: StoreError) -> ApiError {
        ApiError::from_store(err, self.environment)
    }
}

/// Routes without middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::root).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/blog",
            get(handlers::list_posts)
                .post(handlers::create_post)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/blog/:id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Routes with CORS and request tracing
pub fn app(store: Arc<dyn ContentStore>, config: &SiteConfig) -> Result<Router> {
    let state = Arc::new(AppState::new(store, config));
    Ok(build_router(state)
        .layer(cors_layer(&config.server.cors_origin)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    if origin == "*" {
        Ok(layer.allow_origin(Any))
    } else {
        let origin: HeaderValue = origin.parse()?;
        Ok(layer.allow_origin(origin).allow_credentials(true))
    }
}

/// Start the API server and run until Ctrl+C
pub async fn start(site: &Site, store: Arc<dyn ContentStore>) -> Result<()> {
    let server = &site.config.server;
    let app = app(store, &site.config)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if server.ip == "localhost" {
        "127.0.0.1"
    } else {
        server.ip.as_str()
    };
    let addr: SocketAddr = format!("{}:{}", bind_ip, server.port).parse()?;

    println!("Server running at http://{}:{}", server.ip, server.port);
    println!("API available at http://{}:{}/api/blog", server.ip, server.port);
    println!("CORS enabled for: {}", server.cors_origin);
    println!("Environment: {}", server.environment);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BlogPost, PostDraft};
    use crate::store::{ManualClock, MemoryStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state(store: Arc<dyn ContentStore>, env: Environment) -> Arc<AppState> {
        let mut config = SiteConfig::default();
        config.server.environment = env;
        Arc::new(AppState::new(store, &config))
    }

    fn router(store: Arc<dyn ContentStore>) -> Router {
        build_router(test_state(store, Environment::Development))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_default_author() {
        let app = router(Arc::new(MemoryStore::new()));
        let (status, body) = send(
            &app,
            "POST",
            "/api/blog",
            Some(json!({"title": "A", "content": "B", "category": "C"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(!body["_id"].as_str().unwrap().is_empty());
        assert_eq!(body["author"], "404.js Team");
        assert_eq!(body["createdAt"], body["updatedAt"]);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let app = router(Arc::new(MemoryStore::new()));
        let (_, created) = send(
            &app,
            "POST",
            "/api/blog",
            Some(json!({"title": "T", "content": "C", "category": "Design", "author": "Ann"})),
        )
        .await;
        let uri = format!("/api/blog/{}", created["_id"].as_str().unwrap());

        let (status, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let post: BlogPost = serde_json::from_value(fetched).unwrap();
        assert_eq!(post.title, "T");
        assert_eq!(post.content, "C");
        assert_eq!(post.category, "Design");
        assert_eq!(post.author, "Ann");
        assert!(post.created_at <= post.updated_at);
    }

    #[tokio::test]
    async fn test_create_with_empty_title_persists_nothing() {
        let store = Arc::new(MemoryStore::new());
        let app = router(store.clone());
        let (status, body) = send(
            &app,
            "POST",
            "/api/blog",
            Some(json!({"title": "", "content": "B", "category": "C"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(body["details"][0]["field"], "title");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_with_missing_fields_or_bad_json() {
        let store = Arc::new(MemoryStore::new());
        let app = router(store.clone());

        let (status, body) = send(&app, "POST", "/api/blog", Some(json!({"title": "A"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"].as_array().unwrap().len(), 2);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/blog")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let p1 = store.insert(PostDraft::new("P1", "x", "c")).await.unwrap();
        clock.advance(Duration::seconds(1));
        let p2 = store.insert(PostDraft::new("P2", "x", "c")).await.unwrap();

        let (status, body) = send(&router(store), "GET", "/api/blog", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![p2.id.as_str(), p1.id.as_str()]);
    }

    #[tokio::test]
    async fn test_list_query_filters() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(PostDraft::new("Colour theory", "palettes", "Design"))
            .await
            .unwrap();
        store
            .insert(PostDraft::new("Shipping apps", "stores", "Mobile Apps"))
            .await
            .unwrap();
        let app = router(store);

        let (_, body) = send(&app, "GET", "/api/blog?category=design", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["category"], "Design");

        let (_, body) = send(&app, "GET", "/api/blog?keyword=STORES", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Shipping apps");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404_and_store_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let post = store.insert(PostDraft::new("A", "B", "C")).await.unwrap();
        let app = router(store.clone());

        for body in [json!({"title": "X"}), json!({"title": ""}), json!([1, 2])] {
            let (status, resp) = send(&app, "PUT", "/api/blog/bad-id", Some(body)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(resp["error"], "NotFoundError");
        }
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.find_by_id(&post.id).await.unwrap(), post);
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let store = Arc::new(MemoryStore::new());
        let post = store.insert(PostDraft::new("A", "B", "C")).await.unwrap();
        let app = router(store.clone());
        let uri = format!("/api/blog/{}", post.id);

        let (status, body) = send(&app, "PUT", &uri, Some(json!({"category": "Design"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Design");
        assert_eq!(body["title"], "A");
        assert_eq!(body["_id"], post.id.as_str());

        let (status, body) = send(&app, "PUT", &uri, Some(json!({"content": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(store.find_by_id(&post.id).await.unwrap().content, "B");
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let store = Arc::new(MemoryStore::new());
        let post = store.insert(PostDraft::new("A", "B", "C")).await.unwrap();
        let app = router(store.clone());
        let uri = format!("/api/blog/{}", post.id);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NotFoundError");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = build_router(test_state(
            Arc::new(MemoryStore::new()),
            Environment::Production,
        ));
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["environment"], "production");

        let (_, body) = send(&app, "GET", "/", None).await;
        assert_eq!(body["endpoints"]["blog"], "/api/blog");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = router(Arc::new(MemoryStore::new()));
        let (status, body) = send(&app, "GET", "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["path"], "/api/nope");
    }

    #[tokio::test]
    async fn test_unsupported_method_gets_error_body() {
        let store = Arc::new(MemoryStore::new());
        let post = store.insert(PostDraft::new("A", "B", "C")).await.unwrap();
        let app = router(store.clone());
        let uri = format!("/api/blog/{}", post.id);

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({"title": "X"}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "MethodNotAllowedError");
        assert_eq!(body["path"], uri.as_str());
        assert_eq!(store.find_by_id(&post.id).await.unwrap().title, "A");

        let (status, body) = send(&app, "DELETE", "/api/blog", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(body["message"].is_string());
    }

    #[test]
    fn test_cors_layer_accepts_wildcard_and_origin() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("http://localhost:5173").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
