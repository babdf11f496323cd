//! Error types for blob storage operations

use aws_sdk_s3::error::SdkError;
use thiserror::Error;

/// Result type for blob storage operations
pub type BlobStorageResult<T> = Result<T, BlobStorageError>;

/// Errors that can occur during blob storage operations
#[derive(Error, Debug)]
pub enum BlobStorageError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl<E: std::fmt::Debug> From<SdkError<E>> for BlobStorageError {
    fn from(error: SdkError<E>) -> Self {
        match &error {
            SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{service_err:?}"))
            }
            SdkError::ServiceError(service_err) => Self::S3Error(format!("{:?}", service_err.err())),
            _ => Self::AwsError(format!("{error:?}")),
        }
    }
}
