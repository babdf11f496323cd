//! Blob storage gateway adapter
//!
//! The gateway is a pure key-value blob store: `upload` and `delete`, keyed
//! by caller-generated storage keys. Handlers depend on the [`BlobStorage`]
//! trait so tests can substitute a recording double.

mod error;
#[cfg(feature = "test-utils")]
pub mod memory;
mod s3;

use async_trait::async_trait;
use bytes::Bytes;

pub use error::{BlobStorageError, BlobStorageResult};
pub use s3::S3BlobStorage;

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Publicly resolvable location of the blob
    pub location: String,
    /// Key the blob is addressed by in the gateway
    pub key: String,
}

/// Upload/delete interface over an object-storage bucket
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `bytes` under `key` and returns the blob's public location
    ///
    /// # Errors
    ///
    /// Returns [`BlobStorageError`] when the gateway rejects the upload; the
    /// caller aborts the surrounding operation.
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> BlobStorageResult<StoredBlob>;

    /// Removes the blob stored under `key`
    ///
    /// # Errors
    ///
    /// Returns [`BlobStorageError`] when the gateway call fails. Delete-time
    /// failures are logged by the caller, not surfaced.
    async fn delete(&self, key: &str) -> BlobStorageResult<()>;
}
