//! # Application Error
//!
//! Maps service errors to structured HTTP responses. The body shape is
//! the same for every failure:
//!
//! ```json
//! {"error": {"code": 422, "message": "..."}}
//! ```
//!
//! ## Security Invariant
//!
//! Internal failures (store I/O, canonicalization) are logged with their
//! detail and returned as a bare `internal error`. The wire never carries
//! storage paths, serialization dumps, or other internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use edl_service::ServiceError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found within the tenant scope.
    #[error("{0}")]
    NotFound(String),

    /// Request validation failed.
    #[error("{0}")]
    Validation(String),

    /// The operation is not valid for the object's current state or type.
    #[error("{0}")]
    Conflict(String),

    /// Internal failure. The detail is logged, never returned.
    #[error("internal error")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Validation(_) => AppError::Validation(err.to_string()),
            ServiceError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ServiceError::State(_) | ServiceError::TypeMismatch { .. } => {
                AppError::Conflict(err.to_string())
            }
            ServiceError::Canonicalization(_) | ServiceError::Store(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                ServiceError::Validation("a comment is required".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::NotFound {
                    kind: "evidence",
                    id: "evidence:0".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::State("already sealed".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::TypeMismatch {
                    expected: "CONFLICT".to_string(),
                    actual: "REVIEW".to_string(),
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, expected) in cases {
            let status = AppError::from(err).into_response().status();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn internal_detail_never_reaches_the_message() {
        let err = AppError::Internal("/var/lib/edl/snapshot.json: permission denied".to_string());
        assert_eq!(err.to_string(), "internal error");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_keeps_the_service_message() {
        let err = AppError::from(ServiceError::NotFound {
            kind: "work item",
            id: "workitem:7f".to_string(),
        });
        assert_eq!(err.to_string(), "work item workitem:7f not found");
    }
}
