pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Product 42 not found"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that renders as an [`ErrorResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Path extraction error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status, code and client-facing message for this error.
    ///
    /// Server-side failures never leak their cause to the client; it is logged instead.
    fn parts(self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(
                    error_code = ErrorCode::SerdeJsonError.code(),
                    error = ?e,
                    "JSON serialization error"
                );
                internal(ErrorCode::SerdeJsonError)
            }
            AppError::Database(e) => map_db_error(e),
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), error = ?e, "I/O error");
                internal(ErrorCode::IoError)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    error = %e,
                    "JSON extraction error"
                );
                (StatusCode::BAD_REQUEST, ErrorCode::JsonExtraction, e.body_text())
            }
            AppError::QueryRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidQuery.code(),
                    error = %e,
                    "Query extraction error"
                );
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery, e.body_text())
            }
            AppError::PathRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidId.code(),
                    error = %e,
                    "Path extraction error"
                );
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidId, e.body_text())
            }
            AppError::InvalidId(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidId.code(), "Invalid id: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidId, msg)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Bad request: {}",
                    msg
                );
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                internal(ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(
                    error_code = ErrorCode::ServiceUnavailable.code(),
                    "Service unavailable: {}",
                    msg
                );
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable, msg)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn internal(code: ErrorCode) -> (StatusCode, ErrorCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, code, code.default_message().to_string())
}

fn map_db_error(error: DbErr) -> (StatusCode, ErrorCode, String) {
    match error {
        DbErr::RecordNotFound(what) => {
            tracing::info!(
                error_code = ErrorCode::DatabaseNotFound.code(),
                record = %what,
                "Database record not found"
            );
            (
                StatusCode::NOT_FOUND,
                ErrorCode::DatabaseNotFound,
                ErrorCode::DatabaseNotFound.default_message().to_string(),
            )
        }
        DbErr::ConnectionAcquire(e) => {
            tracing::error!(
                error_code = ErrorCode::DatabasePoolTimeout.code(),
                error = ?e,
                "Database pool exhausted"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabasePoolTimeout,
                ErrorCode::DatabasePoolTimeout.default_message().to_string(),
            )
        }
        DbErr::Conn(e) => {
            tracing::error!(
                error_code = ErrorCode::DatabaseConnection.code(),
                error = ?e,
                "Database connection error"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabaseConnection,
                ErrorCode::DatabaseConnection.default_message().to_string(),
            )
        }
        DbErr::Migration(e) => {
            tracing::error!(
                error_code = ErrorCode::MigrationError.code(),
                error = %e,
                "Migration error"
            );
            internal(ErrorCode::MigrationError)
        }
        other => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                error = ?other,
                "Database error"
            );
            internal(ErrorCode::DatabaseError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let (status, body) = render(AppError::NotFound("Product 7 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 1004);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], "Product 7 not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_bad_request_is_validation_error() {
        let (status, body) = render(AppError::BadRequest("count must be >= 1".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let (status, body) = render(AppError::InternalServerError("secret detail".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], ErrorCode::InternalError.default_message());
    }

    #[tokio::test]
    async fn test_db_errors_map_to_status() {
        let (status, body) = render(AppError::Database(DbErr::Custom("boom".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["code"], 2003);

        let (status, body) =
            render(AppError::Database(DbErr::RecordNotFound("products".into()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "DATABASE_NOT_FOUND");
    }
}
