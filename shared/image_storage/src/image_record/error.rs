//! Error types for image record storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError, query::QueryError,
};
use thiserror::Error;

/// Result type alias for storage operations
pub type ImageRecordStorageResult<T> = Result<T, ImageRecordStorageError>;

/// Storage error types for image record operations
#[derive(Debug, Error)]
pub enum ImageRecordStorageError {
    /// Failed to insert image record into `DynamoDB`
    #[error("Failed to insert image record into DynamoDB: {0:?}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to get image record from `DynamoDB`
    #[error("Failed to get image record from DynamoDB: {0:?}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to query image records from `DynamoDB`
    #[error("Failed to query image records from DynamoDB: {0:?}")]
    DynamoDbQueryError(#[from] SdkError<QueryError>),

    /// Failed to delete image record from `DynamoDB`
    #[error("Failed to delete image record from DynamoDB: {0:?}")]
    DynamoDbDeleteError(#[from] SdkError<DeleteItemError>),

    /// Failed to parse image record from a `DynamoDB` item
    #[error("Failed to parse image record: {0}")]
    SerializationError(String),
}

impl From<serde_dynamo::Error> for ImageRecordStorageError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
