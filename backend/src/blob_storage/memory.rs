//! In-memory blob storage used as a recording test double
//!
//! Records every upload/delete call so tests can assert on gateway traffic,
//! and can be flipped into a failing mode per operation. Only compiled with
//! the `test-utils` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{BlobStorage, BlobStorageError, BlobStorageResult, StoredBlob};

/// Base URL baked into locations returned by the double
pub const TEST_PUBLIC_BASE_URL: &str = "https://bucket.test";

/// In-memory implementation of [`BlobStorage`]
#[derive(Debug, Default)]
pub struct InMemoryBlobStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    uploaded_keys: Mutex<Vec<String>>,
    deleted_keys: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryBlobStorage {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `upload` calls fail
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent `delete` calls fail (the call is still recorded)
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Keys passed to `upload`, in call order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploaded_keys.lock().unwrap().clone()
    }

    /// Keys passed to `delete`, in call order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted_keys.lock().unwrap().clone()
    }

    /// Whether a blob is currently stored under `key`
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Bytes stored under `key`, if any
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn upload(
        &self,
        key: &str,
        _content_type: &str,
        bytes: Bytes,
    ) -> BlobStorageResult<StoredBlob> {
        self.uploaded_keys.lock().unwrap().push(key.to_string());

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(BlobStorageError::S3Error(
                "simulated upload failure".to_string(),
            ));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());

        Ok(StoredBlob {
            location: format!("{TEST_PUBLIC_BASE_URL}/{key}"),
            key: key.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> BlobStorageResult<()> {
        self.deleted_keys.lock().unwrap().push(key.to_string());

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(BlobStorageError::S3Error(
                "simulated delete failure".to_string(),
            ));
        }

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
