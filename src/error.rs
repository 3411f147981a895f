//! Error types for the inventory service
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::application::ValidationErrors;
use crate::models::ErrorResponse;
use crate::store::StoreError;

// == App Error Enum ==
/// Unified error type for handlers and the HTTP layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// One or more fields failed validation
    #[error("One or more validation errors occurred")]
    Validation(ValidationErrors),

    /// Malformed body, query string or path
    #[error("{0}")]
    InvalidRequest(String),

    /// Missing or rejected credentials
    #[error("{0}")]
    Unauthorized(String),

    /// A dependency (identity provider) could not be reached
    #[error("{0}")]
    Unavailable(String),

    /// Document store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = match self {
            AppError::Validation(errors) => ErrorResponse::with_errors(
                "One or more validation errors occurred",
                errors,
            ),
            AppError::Store(_) | AppError::Internal(_) => {
                ErrorResponse::new("An internal error occurred")
            }
            other => ErrorResponse::new(other.to_string()),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

// == Extractor Rejections ==
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, AppError>;
