//! Error types for the HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{BrowserError, UploadError, UploadField};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload form is missing required fields (400)
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<UploadField>,
    },

    /// Uploaded image could not be read (422)
    #[error("Failed to read image file: {0}")]
    ImageRead(String),

    /// Conflict (409), e.g. superseded listing or upload already running
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Remote recipe API failed (502)
    #[error("Remote recipe API unavailable: {0}")]
    BadGateway(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<BrowserError> for ApiError {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::NotFound(id) => ApiError::NotFound(format!("recipe {}", id)),
            BrowserError::Superseded { .. } => ApiError::Conflict(err.to_string()),
            BrowserError::Upload(UploadError::Validation(v)) => ApiError::Validation {
                message: v.to_string(),
                fields: v.missing,
            },
            BrowserError::Upload(UploadError::Read(e)) => ApiError::ImageRead(e.to_string()),
            BrowserError::Upload(UploadError::InProgress) => ApiError::Conflict(
                UploadError::InProgress.to_string(),
            ),
            BrowserError::Upload(UploadError::Store(e)) | BrowserError::Store(e) => {
                ApiError::Internal(e.to_string())
            }
            BrowserError::Remote(e) => ApiError::BadGateway(e.to_string()),
        }
    }
}

impl From<larder_common::Error> for ApiError {
    fn from(err: larder_common::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, fields) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Validation { message, fields } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message,
                Some(fields),
            ),
            ApiError::ImageRead(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "READ_ERROR",
                format!("Failed to read image file: {}", msg),
                None,
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "REMOTE_ERROR", msg, None),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
                None,
            ),
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, message = %message, "Request failed");
        }

        let mut error = json!({
            "code": error_code,
            "message": message,
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
