//! Persistence trait for company and file records.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{CompanyRecord, FileId, FileRecord, NewFileRecord, RecordId, UserId};

/// Storage for company records and their referenced file records.
///
/// There is no partial-write surface: the pipeline computes the full merged
/// record in memory and commits it with a single `upsert`. Concurrent
/// submissions for one user are last-writer-wins by design.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The company record owned by `user_id`, if one exists.
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<CompanyRecord>>;

    /// Lookup by record id (legacy path).
    async fn find_by_id(&self, id: RecordId) -> Result<Option<CompanyRecord>>;

    /// Insert the record, or replace the existing record for its user.
    /// Returns the persisted record with store-assigned timestamps.
    async fn upsert(&self, record: CompanyRecord) -> Result<CompanyRecord>;

    /// Insert an immutable file record and return it with its assigned id.
    async fn insert_file(&self, file: NewFileRecord) -> Result<FileRecord>;

    /// Fetch file records by id. Missing ids are simply absent from the
    /// result; callers decide whether that matters.
    async fn get_files(&self, ids: &[FileId]) -> Result<HashMap<FileId, FileRecord>>;
}
