//! In-memory record store used as a test double
//!
//! Same contract as the `DynamoDB` implementation, backed by a mutex-guarded
//! map. Only compiled with the `test-utils` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ImageRecord, ImageRecordStore, ImageRecordStorageResult, NewImageRecord};

/// In-memory implementation of [`ImageRecordStore`]
#[derive(Debug, Default)]
pub struct InMemoryImageRecordStore {
    records: Mutex<HashMap<String, ImageRecord>>,
}

impl InMemoryImageRecordStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether the store holds no records
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ImageRecordStore for InMemoryImageRecordStore {
    async fn list_by_owner(&self, owner: &str) -> ImageRecordStorageResult<Vec<ImageRecord>> {
        let records = self.records.lock().unwrap();
        let mut owned: Vec<ImageRecord> = records
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|r| std::cmp::Reverse(r.created_at));

        Ok(owned)
    }

    async fn get_one(&self, id: &str) -> ImageRecordStorageResult<Option<ImageRecord>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
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

        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());

        Ok(record)
    }

    async fn update(&self, record: ImageRecord) -> ImageRecordStorageResult<ImageRecord> {
        let record = ImageRecord {
            updated_at: chrono::Utc::now().timestamp().max(record.created_at),
            ..record
        };

        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());

        Ok(record)
    }

    async fn delete(&self, id: &str) -> ImageRecordStorageResult<()> {
        self.records.lock().unwrap().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(name: &str, owner: &str) -> NewImageRecord {
        NewImageRecord {
            name: name.to_string(),
            url: format!("https://bucket.test/{name}"),
            file_type: "image/png".to_string(),
            storage_key: Some(name.to_string()),
            owner: owner.to_string(),
            favorite: None,
            tag: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = InMemoryImageRecordStore::new();

        let record = store.create(new_record("cat.png", "user-a")).await.unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(store.get_one(&record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_list_by_owner_scopes_and_sorts() {
        let store = InMemoryImageRecordStore::new();

        store.create(new_record("a.png", "user-a")).await.unwrap();
        store.create(new_record("b.png", "user-a")).await.unwrap();
        store.create(new_record("c.png", "user-b")).await.unwrap();

        let listed = store.list_by_owner("user-a").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.owner == "user-a"));
        assert!(listed[0].created_at >= listed[1].created_at);
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let store = InMemoryImageRecordStore::new();

        let mut record = store.create(new_record("cat.png", "user-a")).await.unwrap();
        record.name = "kitten.png".to_string();

        let updated = store.update(record.clone()).await.unwrap();

        assert_eq!(updated.name, "kitten.png");
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(store.get_one(&record.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = InMemoryImageRecordStore::new();

        let record = store.create(new_record("cat.png", "user-a")).await.unwrap();
        store.delete(&record.id).await.unwrap();

        assert_eq!(store.get_one(&record.id).await.unwrap(), None);
        assert!(store.is_empty());
    }
}
