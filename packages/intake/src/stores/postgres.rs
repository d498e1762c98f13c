//! PostgreSQL record store.
//!
//! One row per user in `company_records`, one JSONB column per document
//! slot; `files` is append-only. Migrations run at startup the same way the
//! rest of this codebase bootstraps its tables.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{IntakeError, Result};
use crate::traits::RecordStore;
use crate::types::{
    CompanyRecord, ConstitutionValue, DocumentSlot, FileId, FileRecord, NewFileRecord, RecordId,
    SlotValue, UserId,
};

/// PostgreSQL-backed record store.
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Connect and run migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(storage_err)?;
        Self::from_pool(pool).await
    }

    /// Reuse an existing pool (e.g. the server's) and run migrations.
    pub async fn from_pool(pool: PgPool) -> Result<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS files (
                id UUID PRIMARY KEY,
                file_name TEXT NOT NULL,
                file_url TEXT NOT NULL,
                file_type TEXT NOT NULL,
                upload_date TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS company_records (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL UNIQUE,
                intended_company_name JSONB,
                alternative_company_name_1 JSONB,
                alternative_company_name_2 JSONB,
                company_activities JSONB,
                intended_registered_address JSONB,
                financial_year_end JSONB,
                constitution JSONB,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

fn storage_err(e: sqlx::Error) -> IntakeError {
    IntakeError::Storage(e.to_string().into())
}

fn slot_column(row: &PgRow, column: &str) -> Result<Option<SlotValue>> {
    let value: Option<serde_json::Value> = row.try_get(column).map_err(storage_err)?;
    value.map(serde_json::from_value).transpose().map_err(Into::into)
}

fn record_from_row(row: &PgRow) -> Result<CompanyRecord> {
    let constitution: Option<serde_json::Value> =
        row.try_get("constitution").map_err(storage_err)?;
    let constitution: Option<ConstitutionValue> = constitution
        .map(serde_json::from_value)
        .transpose()?;

    Ok(CompanyRecord {
        id: row.try_get("id").map_err(storage_err)?,
        user_id: row.try_get("user_id").map_err(storage_err)?,
        intended_company_name: slot_column(row, "intended_company_name")?,
        alternative_company_name_1: slot_column(row, "alternative_company_name_1")?,
        alternative_company_name_2: slot_column(row, "alternative_company_name_2")?,
        company_activities: slot_column(row, "company_activities")?,
        intended_registered_address: slot_column(row, "intended_registered_address")?,
        financial_year_end: slot_column(row, "financial_year_end")?,
        constitution,
        created_at: row.try_get("created_at").map_err(storage_err)?,
        updated_at: row.try_get("updated_at").map_err(storage_err)?,
    })
}

fn to_json(value: &Option<SlotValue>) -> Result<Option<serde_json::Value>> {
    value.as_ref().map(serde_json::to_value).transpose().map_err(Into::into)
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<CompanyRecord>> {
        let row = sqlx::query("SELECT * FROM company_records WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<CompanyRecord>> {
        let row = sqlx::query("SELECT * FROM company_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn upsert(&self, record: CompanyRecord) -> Result<CompanyRecord> {
        let constitution = record
            .constitution
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let row = sqlx::query(
            r#"
            INSERT INTO company_records (
                id, user_id,
                intended_company_name, alternative_company_name_1,
                alternative_company_name_2, company_activities,
                intended_registered_address, financial_year_end, constitution
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                intended_company_name = EXCLUDED.intended_company_name,
                alternative_company_name_1 = EXCLUDED.alternative_company_name_1,
                alternative_company_name_2 = EXCLUDED.alternative_company_name_2,
                company_activities = EXCLUDED.company_activities,
                intended_registered_address = EXCLUDED.intended_registered_address,
                financial_year_end = EXCLUDED.financial_year_end,
                constitution = EXCLUDED.constitution,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(to_json(&record.intended_company_name)?)
        .bind(to_json(&record.alternative_company_name_1)?)
        .bind(to_json(&record.alternative_company_name_2)?)
        .bind(to_json(&record.company_activities)?)
        .bind(to_json(&record.intended_registered_address)?)
        .bind(to_json(&record.financial_year_end)?)
        .bind(constitution)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        record_from_row(&row)
    }

    async fn insert_file(&self, file: NewFileRecord) -> Result<FileRecord> {
        let id = FileId::new();
        let row = sqlx::query(
            r#"
            INSERT INTO files (id, file_name, file_url, file_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, file_name, file_url, file_type, upload_date
            "#,
        )
        .bind(id)
        .bind(&file.file_name)
        .bind(&file.file_url)
        .bind(file.file_type.wire_name())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        file_from_row(&row)
    }

    async fn get_files(&self, ids: &[FileId]) -> Result<HashMap<FileId, FileRecord>> {
        let raw_ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let rows = sqlx::query(
            "SELECT id, file_name, file_url, file_type, upload_date FROM files WHERE id = ANY($1)",
        )
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter()
            .map(|row| file_from_row(row).map(|f| (f.id, f)))
            .collect()
    }
}

fn file_from_row(row: &PgRow) -> Result<FileRecord> {
    let file_type: String = row.try_get("file_type").map_err(storage_err)?;
    let file_type = DocumentSlot::from_wire_name(&file_type).ok_or_else(|| {
        IntakeError::Storage(format!("unknown file_type in files table: {file_type}").into())
    })?;

    Ok(FileRecord {
        id: row.try_get("id").map_err(storage_err)?,
        file_name: row.try_get("file_name").map_err(storage_err)?,
        file_url: row.try_get("file_url").map_err(storage_err)?,
        file_type,
        upload_date: row.try_get("upload_date").map_err(storage_err)?,
    })
}
