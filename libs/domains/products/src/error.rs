use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with id {0} not found")]
    NotFound(i64),

    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    #[error("Cannot sort products by '{0}'")]
    UnknownSortField(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::InvalidPage(_) | ProductError::UnknownSortField(_) => {
                AppError::BadRequest(err.to_string())
            }
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ProductError::NotFound(9), StatusCode::NOT_FOUND),
            (ProductError::InvalidPage("count".into()), StatusCode::BAD_REQUEST),
            (ProductError::UnknownSortField("colour".into()), StatusCode::BAD_REQUEST),
            (
                ProductError::Database(DbErr::Custom("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_not_found_message_names_the_id() {
        assert_eq!(ProductError::NotFound(42).to_string(), "Product with id 42 not found");
    }
}
