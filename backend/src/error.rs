//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::repositories::RepositoryError;
use crate::uploads::UploadError;
use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use content_hub_shared::{AuthError, FieldError, MessageResponse, ValidationErrorResponse};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Repository error")]
    Repository(#[source] RepositoryError),

    #[error("Upload error")]
    Upload(#[from] UploadError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => ApiError::Conflict("user exists".to_string()),
            other => ApiError::Repository(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Auth(AuthError::InvalidCredentials) => StatusCode::BAD_REQUEST,
            // Ownership failures share 401 with token failures
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Repository(_) | ApiError::Upload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::Validation(errors) => {
                return (status, Json(ValidationErrorResponse { errors })).into_response();
            }
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Auth(err) => err.to_string(),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                "server error".to_string()
            }
            ApiError::Repository(err) => {
                error!("Repository error: {:?}", err);
                "server error".to_string()
            }
            ApiError::Upload(err) => {
                error!("Upload error: {:?}", err);
                "server error".to_string()
            }
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
