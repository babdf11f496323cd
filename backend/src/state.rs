//! Application state management

use std::sync::Arc;

use image_storage::image_record::ImageRecordStore;

use crate::auth::TokenVerifier;
use crate::blob_storage::BlobStorage;
use crate::types::Environment;

/// Application state shared across handlers
///
/// The record store and the blob storage gateway are injected as trait
/// objects so tests can substitute in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    /// Image record store
    pub record_store: Arc<dyn ImageRecordStore>,
    /// Blob storage gateway
    pub blob_storage: Arc<dyn BlobStorage>,
    /// Bearer token verifier
    pub token_verifier: Arc<TokenVerifier>,
    /// Environment configuration
    pub environment: Environment,
}
