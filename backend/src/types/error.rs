//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use image_storage::image_record::ImageRecordStorageError;
use serde::Serialize;

use crate::auth::AuthError;
use crate::blob_storage::BlobStorageError;
use crate::ownership::OwnershipError;

/// API error response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client should retry the request
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        retry: bool,
    ) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                allow_retry: retry,
                error: ErrorBody {
                    code,
                    message: message.into(),
                },
            },
        }
    }

    /// 404 for a record id that does not resolve, with no further detail
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "Not found", false)
    }

    /// 400 for missing or malformed request fields
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message, false)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// A failed ownership check aborts the operation with no partial effect
impl From<OwnershipError> for AppError {
    fn from(_: OwnershipError) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "forbidden",
            "You do not own this resource",
            false,
        )
    }
}

/// Convert bearer-token verification failures to application errors
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        tracing::warn!("Token verification failed: {err}");
        Self::new(
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "Invalid or expired token",
            false,
        )
    }
}

/// Convert multipart parsing failures to application errors
impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        tracing::warn!("Multipart parsing error: {err}");
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_multipart",
            "Invalid multipart request body",
            false,
        )
    }
}

/// Convert record store errors to application errors
///
/// Store errors never leak internal detail to the client.
impl From<ImageRecordStorageError> for AppError {
    fn from(err: ImageRecordStorageError) -> Self {
        tracing::error!("Record store error: {err}");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error",
            true,
        )
    }
}

/// Convert blob gateway errors to application errors
impl From<BlobStorageError> for AppError {
    #[allow(clippy::cognitive_complexity)]
    fn from(err: BlobStorageError) -> Self {
        match &err {
            BlobStorageError::UpstreamError(msg) => {
                tracing::error!("Blob storage upstream error: {msg}");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "upstream_error",
                    "Blob storage temporarily unavailable",
                    true,
                )
            }
            BlobStorageError::S3Error(msg) | BlobStorageError::AwsError(msg) => {
                tracing::error!("Blob storage error: {msg}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                    true,
                )
            }
        }
    }
}
