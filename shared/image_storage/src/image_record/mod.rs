//! Image record storage module for `DynamoDB` operations

mod error;
#[cfg(feature = "test-utils")]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
pub use error::{ImageRecordStorageError, ImageRecordStorageResult};
use serde::{Deserialize, Serialize};
use serde_dynamo::{from_items, to_item};
use strum::Display;

/// A stored image record
///
/// Serialized camelCase both over HTTP and into the record store, with absent
/// optional fields omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Primary key - unique record ID (UUID v4), assigned on create
    pub id: String,
    /// Display label
    pub name: String,
    /// Publicly resolvable location of the stored blob
    pub url: String,
    /// MIME type of the blob
    pub file_type: String,
    /// Key addressing the blob in the storage gateway; present only when a
    /// blob was uploaded through this API (legacy records may lack it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    /// ID of the creating identity; set once on create, never from client input
    pub owner: String,
    /// Optional favorite flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    /// Optional free-text tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Creation timestamp (epoch seconds), set by the store
    pub created_at: i64,
    /// Last-update timestamp (epoch seconds), refreshed by the store
    pub updated_at: i64,
}

/// Fields of a record to be created; `id` and timestamps are assigned by the
/// store
#[derive(Debug, Clone)]
pub struct NewImageRecord {
    /// Display label
    pub name: String,
    /// Publicly resolvable location of the stored blob
    pub url: String,
    /// MIME type of the blob
    pub file_type: String,
    /// Key addressing the blob in the storage gateway, when one was uploaded
    pub storage_key: Option<String>,
    /// ID of the creating identity
    pub owner: String,
    /// Optional favorite flag
    pub favorite: Option<bool>,
    /// Optional free-text tag
    pub tag: Option<String>,
}

/// `DynamoDB` attribute names for the image record table
#[derive(Debug, Display)]
#[strum(serialize_all = "camelCase")]
pub enum ImageRecordAttribute {
    /// Primary key - unique record ID
    Id,
    /// Display label
    Name,
    /// Blob location
    Url,
    /// MIME type
    FileType,
    /// Storage gateway key
    StorageKey,
    /// Creating identity (used for the owner GSI)
    Owner,
    /// Favorite flag
    Favorite,
    /// Free-text tag
    Tag,
    /// Creation timestamp
    CreatedAt,
    /// Last-update timestamp
    UpdatedAt,
}

/// Store interface the image resource API depends on
///
/// Injected into the handlers as a trait object so router tests can swap in
/// the in-memory implementation.
#[async_trait]
pub trait ImageRecordStore: Send + Sync {
    /// List all records owned by `owner`, newest first
    async fn list_by_owner(&self, owner: &str) -> ImageRecordStorageResult<Vec<ImageRecord>>;

    /// Get a single record by ID
    async fn get_one(&self, id: &str) -> ImageRecordStorageResult<Option<ImageRecord>>;

    /// Create a new record with a generated ID and timestamps
    async fn create(&self, request: NewImageRecord) -> ImageRecordStorageResult<ImageRecord>;

    /// Replace a record wholesale, refreshing `updated_at`
    ///
    /// Last write wins; there is no optimistic-concurrency check.
    async fn update(&self, record: ImageRecord) -> ImageRecordStorageResult<ImageRecord>;

    /// Delete a record by ID
    async fn delete(&self, id: &str) -> ImageRecordStorageResult<()>;
}

/// `DynamoDB`-backed record store
pub struct DynamoImageRecordStore {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    owner_index_name: String,
}

impl DynamoImageRecordStore {
    /// Creates a new store instance
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured `DynamoDB` client
    /// * `table_name` - `DynamoDB` table name for image records
    /// * `owner_index_name` - Name of the GSI for owner queries
    #[must_use]
    pub const fn new(
        dynamodb_client: Arc<DynamoDbClient>,
        table_name: String,
        owner_index_name: String,
    ) -> Self {
        Self {
            dynamodb_client,
            table_name,
            owner_index_name,
        }
    }
}

#[async_trait]
impl ImageRecordStore for DynamoImageRecordStore {
    async fn list_by_owner(&self, owner: &str) -> ImageRecordStorageResult<Vec<ImageRecord>> {
        let response = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .index_name(&self.owner_index_name)
            .key_condition_expression("#owner = :owner")
            .expression_attribute_names("#owner", ImageRecordAttribute::Owner.to_string())
            .expression_attribute_values(":owner", AttributeValue::S(owner.to_string()))
            .send()
            .await?;

        let items = response.items.unwrap_or_default();
        let mut records = from_items::<_, ImageRecord>(items)?;
        records.sort_by_key(|r| std::cmp::Reverse(r.created_at));

        Ok(records)
    }

    async fn get_one(&self, id: &str) -> ImageRecordStorageResult<Option<ImageRecord>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(
                ImageRecordAttribute::Id.to_string(),
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await?;

        response
            .item()
            .map(|item| {
                serde_dynamo::from_item(item.clone())
                    .map_err(|e| ImageRecordStorageError::SerializationError(e.to_string()))
            })
            .transpose()
    }

    async fn create(&self, request: NewImageRecord) -> ImageRecordStorageResult<ImageRecord> {
        let now = chrono::Utc::now().timestamp();

        let record = ImageRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name,
            url: request.url,
            file_type: request.file_type,
            storage_key: request.storage_key,
            owner: request.owner,
            favorite: request.favorite,
            tag: request.tag,
            created_at: now,
            updated_at: now,
        };

        let item = to_item(&record)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(record)
    }

    async fn update(&self, record: ImageRecord) -> ImageRecordStorageResult<ImageRecord> {
        let record = ImageRecord {
            updated_at: chrono::Utc::now().timestamp().max(record.created_at),
            ..record
        };

        let item = to_item(&record)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> ImageRecordStorageResult<()> {
        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .key(
                ImageRecordAttribute::Id.to_string(),
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ImageRecord {
        ImageRecord {
            id: "test-id".to_string(),
            name: "cat.png".to_string(),
            url: "https://bucket/cat123.png".to_string(),
            file_type: "image/png".to_string(),
            storage_key: Some("cat123.png".to_string()),
            owner: "user-a".to_string(),
            favorite: Some(true),
            tag: Some("pets".to_string()),
            created_at: chrono::Utc::now().timestamp(),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_image_record_serialization() {
        let record = sample_record();

        let serialized = serde_json::to_string(&record).unwrap();
        let deserialized: ImageRecord = serde_json::from_str(&serialized).unwrap();

        assert_eq!(record, deserialized);
    }

    #[test]
    fn test_image_record_camel_case_fields() {
        let record = sample_record();

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();

        assert_eq!(json["fileType"], "image/png");
        assert_eq!(json["storageKey"], "cat123.png");
        assert!(json["createdAt"].is_i64());
        assert!(json["updatedAt"].is_i64());
        assert!(json.get("file_type").is_none());
    }

    #[test]
    fn test_image_record_optional_fields_omitted() {
        let record = ImageRecord {
            storage_key: None,
            favorite: None,
            tag: None,
            ..sample_record()
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();

        assert!(json.get("storageKey").is_none());
        assert!(json.get("favorite").is_none());
        assert!(json.get("tag").is_none());
    }

    #[test]
    fn test_attribute_names_match_serde_fields() {
        assert_eq!(ImageRecordAttribute::Id.to_string(), "id");
        assert_eq!(ImageRecordAttribute::FileType.to_string(), "fileType");
        assert_eq!(ImageRecordAttribute::StorageKey.to_string(), "storageKey");
        assert_eq!(ImageRecordAttribute::Owner.to_string(), "owner");
        assert_eq!(ImageRecordAttribute::CreatedAt.to_string(), "createdAt");
    }
}
