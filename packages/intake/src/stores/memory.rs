//! In-memory record store for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::RecordStore;
use crate::types::{CompanyRecord, FileId, FileRecord, NewFileRecord, RecordId, UserId};

/// In-memory storage for company and file records.
///
/// Useful for tests and local development. Data is lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<UserId, CompanyRecord>>,
    files: RwLock<HashMap<FileId, FileRecord>>,
}

impl MemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored company records.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Number of stored file records.
    pub fn file_count(&self) -> usize {
        self.files.read().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<CompanyRecord>> {
        Ok(self.records.read().unwrap().get(&user_id).cloned())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<CompanyRecord>> {
        Ok(self
            .records
            .read()
            .unwrap()
            .values()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn upsert(&self, mut record: CompanyRecord) -> Result<CompanyRecord> {
        let mut records = self.records.write().unwrap();
        let now = Utc::now();
        if let Some(existing) = records.get(&record.user_id) {
            record.id = existing.id;
            record.created_at = existing.created_at;
        }
        record.updated_at = now;
        records.insert(record.user_id, record.clone());
        Ok(record)
    }

    async fn insert_file(&self, file: NewFileRecord) -> Result<FileRecord> {
        let record = FileRecord {
            id: FileId::new(),
            file_name: file.file_name,
            file_url: file.file_url,
            file_type: file.file_type,
            upload_date: Utc::now(),
        };
        self.files
            .write()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_files(&self, ids: &[FileId]) -> Result<HashMap<FileId, FileRecord>> {
        let files = self.files.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| files.get(id).map(|f| (*id, f.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentSlot;

    #[tokio::test]
    async fn test_upsert_keeps_identity_per_user() {
        let store = MemoryRecordStore::new();
        let user_id = UserId::new();

        let first = store.upsert(CompanyRecord::new(user_id)).await.unwrap();
        let second = store.upsert(CompanyRecord::new(user_id)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id_matches_upserted_record() {
        let store = MemoryRecordStore::new();
        let record = store
            .upsert(CompanyRecord::new(UserId::new()))
            .await
            .unwrap();

        let found = store.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(found.user_id, record.user_id);
        assert!(store.find_by_id(RecordId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_files_are_immutable_inserts() {
        let store = MemoryRecordStore::new();
        let a = store
            .insert_file(NewFileRecord {
                file_name: "a.pdf".into(),
                file_url: "https://blobs.example/a.pdf".into(),
                file_type: DocumentSlot::Constitution,
            })
            .await
            .unwrap();
        let b = store
            .insert_file(NewFileRecord {
                file_name: "a.pdf".into(),
                file_url: "https://blobs.example/a.pdf".into(),
                file_type: DocumentSlot::Constitution,
            })
            .await
            .unwrap();

        // Same content, different identity
        assert_ne!(a.id, b.id);

        let fetched = store.get_files(&[a.id, b.id, FileId::new()]).await.unwrap();
        assert_eq!(fetched.len(), 2);
    }
}
