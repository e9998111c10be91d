//! Blog API transport used by the client

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::{BoxError, Service, ServiceExt};

use crate::config::ClientConfig;
use crate::content::{BlogPost, PostDraft, PostId, PostPatch};

/// Largest response body the client will buffer
const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error body
    #[error("{message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out")]
    Timeout,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Request/response round-trips against the blog endpoints
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list(&self) -> Result<Vec<BlogPost>, ClientError>;

    async fn get(&self, id: &PostId) -> Result<BlogPost, ClientError>;

    async fn create(&self, draft: &PostDraft) -> Result<BlogPost, ClientError>;

    async fn update(&self, id: &PostId, patch: &PostPatch) -> Result<BlogPost, ClientError>;

    async fn delete(&self, id: &PostId) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// JSON over HTTP through any tower service, e.g. the API router itself
/// or a connector-backed HTTP client
#[derive(Clone)]
pub struct HttpBlogApi<S> {
    service: S,
    base_url: String,
}

impl<S> HttpBlogApi<S> {
    /// `base_url` is prefixed to `/api/blog`; it may be empty for
    /// in-process services
    pub fn new(service: S, base_url: impl Into<String>) -> Self {
        Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client pointed at the configured `api_url`
    pub fn from_config(service: S, config: &ClientConfig) -> Self {
        Self::new(service, config.api_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/blog{}", self.base_url, path)
    }
}

impl<S> HttpBlogApi<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<(StatusCode, Bytes), ClientError> {
        let mut builder = Request::builder().method(method).uri(url);
        let body = match body {
            Some(b) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(b)?)
            }
            None => Body::empty(),
        };
        let request = builder
            .body(body)
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let response = self
            .service
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Transport(e.into().to_string()))?;

        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok((status, bytes))
    }

    async fn call<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let (status, bytes) = self.send(method, self.url(path), body).await?;
        if !status.is_success() {
            return Err(decode_error(status, &bytes));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn decode_error(status: StatusCode, bytes: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorBody>(bytes) {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            kind: body.error,
            message: if body.message.is_empty() {
                status.to_string()
            } else {
                body.message
            },
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            kind: String::new(),
            message: String::from_utf8_lossy(bytes).trim().to_string(),
        },
    }
}

#[async_trait]
impl<S> BlogApi for HttpBlogApi<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    async fn list(&self) -> Result<Vec<BlogPost>, ClientError> {
        self.call(Method::GET, "", None::<&()>).await
    }

    async fn get(&self, id: &PostId) -> Result<BlogPost, ClientError> {
        self.call(Method::GET, &format!("/{}", id), None::<&()>)
            .await
    }

    async fn create(&self, draft: &PostDraft) -> Result<BlogPost, ClientError> {
        self.call(Method::POST, "", Some(draft)).await
    }

    async fn update(&self, id: &PostId, patch: &PostPatch) -> Result<BlogPost, ClientError> {
        self.call(Method::PUT, &format!("/{}", id), Some(patch))
            .await
    }

    async fn delete(&self, id: &PostId) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .call(Method::DELETE, &format!("/{}", id), None::<&()>)
            .await?;
        Ok(())
    }
}
