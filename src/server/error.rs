//! API error type and its JSON rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::Environment;
use crate::content::{PostId, ValidationErrors};
use crate::store::StoreError;

/// Error body: `{error, message, details?, path?}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(ValidationErrors),

    #[error("Blog post not found: {0}")]
    NotFound(PostId),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Store failure; `expose` controls whether the cause reaches the client
    #[error("Store error: {source}")]
    Store { source: StoreError, expose: bool },
}

impl ApiError {
    /// Map a store outcome, deciding detail exposure from the environment
    pub fn from_store(err: StoreError, env: Environment) -> Self {
        match err {
            StoreError::Validation(errors) => ApiError::Validation(errors),
            StoreError::NotFound(id) => ApiError::NotFound(id),
            source => ApiError::Store {
                source,
                expose: env.is_development(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::NotFound(_) | ApiError::RouteNotFound(_) => "NotFoundError",
            ApiError::MethodNotAllowed { .. } => "MethodNotAllowedError",
            ApiError::Store { .. } => "StoreError",
        }
    }

    fn body(&self) -> ErrorBody {
        let kind = self.kind();
        match self {
            ApiError::Validation(errors) => ErrorBody {
                error: kind,
                message: errors.to_string(),
                details: serde_json::to_value(errors.errors()).ok(),
                path: None,
            },
            ApiError::NotFound(_) => ErrorBody {
                error: kind,
                message: "Blog post not found".to_string(),
                details: None,
                path: None,
            },
            ApiError::RouteNotFound(path) => ErrorBody {
                error: kind,
                message: "Route not found".to_string(),
                details: None,
                path: Some(path.clone()),
            },
            ApiError::MethodNotAllowed { method, path } => ErrorBody {
                error: kind,
                message: format!("Method {} not allowed", method),
                details: None,
                path: Some(path.clone()),
            },
            ApiError::Store { source, expose } => ErrorBody {
                error: kind,
                message: "Something went wrong".to_string(),
                details: expose.then(|| serde_json::Value::String(source.to_string())),
                path: None,
            },
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        } else {
            tracing::warn!(kind = self.kind(), status = status.as_u16(), "{}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_error() -> StoreError {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "disk is read-only",
        ))
    }

    #[test]
    fn test_store_outcomes_map_to_status() {
        let env = Environment::Production;
        let not_found = ApiError::from_store(StoreError::NotFound(PostId::from("x")), env);
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.kind(), "NotFoundError");

        let invalid = ApiError::from_store(ValidationErrors::body("bad").into(), env);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.kind(), "ValidationError");

        let backend = ApiError::from_store(backend_error(), env);
        assert_eq!(backend.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(backend.kind(), "StoreError");
    }

    #[test]
    fn test_method_not_allowed_body() {
        let err = ApiError::MethodNotAllowed {
            method: "PATCH".to_string(),
            path: "/api/blog/abc".to_string(),
        };
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = err.body();
        assert_eq!(body.error, "MethodNotAllowedError");
        assert_eq!(body.message, "Method PATCH not allowed");
        assert_eq!(body.path.as_deref(), Some("/api/blog/abc"));
    }

    #[test]
    fn test_production_hides_store_details() {
        let body = ApiError::from_store(backend_error(), Environment::Production).body();
        assert!(body.details.is_none());
        assert!(!body.message.contains("read-only"));
    }

    #[test]
    fn test_development_exposes_store_details() {
        let body = ApiError::from_store(backend_error(), Environment::Development).body();
        let details = body.details.unwrap();
        assert!(details.as_str().unwrap().contains("read-only"));
    }

    #[test]
    fn test_validation_details_list_fields() {
        let body = ApiError::Validation(ValidationErrors::body("Malformed JSON")).body();
        let details = body.details.unwrap();
        assert_eq!(details[0]["field"], "body");
        assert_eq!(details[0]["message"], "Malformed JSON");
    }
}
