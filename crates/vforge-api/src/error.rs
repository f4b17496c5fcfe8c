//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use vforge_media::MediaError;
use vforge_models::{ErrorResponse, ValidationError};
use vforge_storage::StorageError;
use vforge_worker::JobError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request")]
    Validation(#[from] ValidationError),

    #[error("Payload too large")]
    PayloadTooLarge(String),

    #[error("Video processing failed")]
    Transform(MediaError),

    #[error("Processing succeeded but cloud upload failed")]
    Upload(StorageError),

    #[error("Internal error")]
    Internal(String),
}

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        match e {
            JobError::Transform(e) => Self::Transform(e),
            JobError::Upload(e) => Self::Upload(e),
        }
    }
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Transform(_) | ApiError::Upload(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::PayloadTooLarge(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Transform(e) => e.details(),
            ApiError::Upload(e) => e.to_string(),
        }
    }
}

impl ApiError {
    /// Render as `{error, details}`. In production internal details are
    /// logged but left out of the body.
    pub fn into_response_for(self, production: bool) -> Response {
        let status = self.status_code();
        let details = self.details();

        if status.is_server_error() {
            error!(status = %status, "{}: {}", self, details);
        } else {
            warn!(status = %status, "{}: {}", self, details);
        }

        let details = match &self {
            ApiError::Internal(_) if production => None,
            _ => Some(details),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
