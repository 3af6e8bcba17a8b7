//! Reusable OpenAPI response types for `#[utoipa::path(responses(...))]`.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2003,
        "error": "DATABASE_ERROR",
        "message": "Database error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - malformed path, query or body",
    content_type = "application/json",
    example = json!({
        "code": 1010,
        "error": "INVALID_QUERY",
        "message": "Failed to deserialize query string: count: invalid digit found in string"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Product with id 42 not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "code": 2013,
        "error": "DATABASE_POOL_TIMEOUT",
        "message": "Database connection pool timed out"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
