//! S3-backed blob storage gateway

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client as S3Client};
use bytes::Bytes;
use tracing::debug;

use super::{BlobStorage, BlobStorageResult, StoredBlob};

/// Blob storage gateway backed by an S3 bucket
pub struct S3BlobStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    public_base_url: String,
}

impl S3BlobStorage {
    /// Creates a new gateway
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for blob storage
    /// * `public_base_url` - Base URL under which uploaded objects resolve
    #[must_use]
    pub fn new(s3_client: Arc<S3Client>, bucket_name: String, public_base_url: String) -> Self {
        Self {
            s3_client,
            bucket_name,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn location_for(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

#[async_trait]
impl BlobStorage for S3BlobStorage {
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> BlobStorageResult<StoredBlob> {
        debug!(key, content_type, size = bytes.len(), "uploading blob");

        // Objects are publicly readable; records store the returned location
        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await?;

        Ok(StoredBlob {
            location: self.location_for(key),
            key: key.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> BlobStorageResult<()> {
        debug!(key, "deleting blob");

        self.s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        Ok(())
    }
}
