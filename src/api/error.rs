//! HTTP mapping for domain errors

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::{DomainError, FieldErrors};

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            DomainError::Authentication => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid credentials" }),
            ),
            DomainError::Authorization => {
                (StatusCode::FORBIDDEN, json!({ "message": "Unauthorized" }))
            }
            DomainError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": "The given data was invalid.", "errors": errors }),
            ),
            DomainError::Conflict(reason) => (StatusCode::CONFLICT, json!({ "message": reason })),
            DomainError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "message": format!("{what} not found") }),
            ),
            DomainError::Database(detail) | DomainError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Malformed or mistyped request bodies are reported like any other
/// validation failure
impl From<JsonRejection> for DomainError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert("body".to_string(), vec![rejection.body_text()]);
        DomainError::Validation(errors)
    }
}

impl From<QueryRejection> for DomainError {
    fn from(rejection: QueryRejection) -> Self {
        DomainError::invalid("query", rejection.body_text())
    }
}

impl From<PathRejection> for DomainError {
    fn from(rejection: PathRejection) -> Self {
        DomainError::invalid("path", rejection.body_text())
    }
}
