//! Marketplace Error Types
//!
//! Domain errors for the four content entities, integrated with the
//! unified `kernel::error::AppError` system. Status codes follow the
//! shared contract: 400 validation/business rule, 401 authorization,
//! 404 not found, 500 anything else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::upload::UploadError;
use thiserror::Error;

/// Marketplace result type alias
pub type MarketResult<T> = Result<T, MarketError>;

/// Marketplace error variants
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Book not found")]
    BookNotFound,

    #[error("Mentor not found")]
    MentorNotFound,

    #[error("PYQ not found")]
    PyqNotFound,

    #[error("Blog not found")]
    BlogNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    /// Actor exists check passed but the ownership guard failed
    #[error("Not authorized")]
    NotAuthorized,

    /// Field-level validation failure
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Business rule violation (unavailable book, self-rent, rating
    /// out of range, duplicate mentor profile)
    #[error("{0}")]
    BusinessRule(String),

    /// File upload rejected or failed
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::BookNotFound
            | MarketError::MentorNotFound
            | MarketError::PyqNotFound
            | MarketError::BlogNotFound
            | MarketError::CommentNotFound => StatusCode::NOT_FOUND,
            MarketError::NotAuthorized => StatusCode::UNAUTHORIZED,
            MarketError::Validation(_) | MarketError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            MarketError::Upload(e) => match e {
                UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            MarketError::Database(_) | MarketError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::BookNotFound
            | MarketError::MentorNotFound
            | MarketError::PyqNotFound
            | MarketError::BlogNotFound
            | MarketError::CommentNotFound => ErrorKind::NotFound,
            MarketError::NotAuthorized => ErrorKind::Unauthorized,
            MarketError::Validation(_) | MarketError::BusinessRule(_) => ErrorKind::BadRequest,
            MarketError::Upload(e) => match e {
                UploadError::Io(_) => ErrorKind::InternalServerError,
                _ => ErrorKind::BadRequest,
            },
            MarketError::Database(_) | MarketError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            MarketError::Database(e) => {
                tracing::error!(error = %e, "Marketplace database error");
            }
            MarketError::Internal(msg) => {
                tracing::error!(message = %msg, "Marketplace internal error");
            }
            MarketError::Upload(UploadError::Io(e)) => {
                tracing::error!(error = %e, "Upload storage error");
            }
            _ => {
                tracing::debug!(error = %self, "Marketplace error");
            }
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(MarketError::BookNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            MarketError::NotAuthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            MarketError::BusinessRule("Book is not available for rent".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MarketError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MarketError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upload_error_mapping() {
        let too_large = MarketError::Upload(UploadError::TooLarge);
        assert_eq!(too_large.status_code(), StatusCode::BAD_REQUEST);
    }
}
