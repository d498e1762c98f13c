//! Persisted company and file records.
//!
//! A `CompanyRecord` holds up to seven optional document slots for one user.
//! `FileRecord`s are immutable: every upload inserts a new row and old rows
//! are never deleted, so a record's `file_id` always points at the exact
//! upload its text and value were derived from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::id::{FileId, RecordId, UserId};
use crate::types::slot::{ConstitutionOption, DocumentSlot, SUMMARIZED_SLOTS};

/// One stored upload. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: FileId,
    pub file_name: String,
    pub file_url: String,
    pub file_type: DocumentSlot,
    pub upload_date: DateTime<Utc>,
}

/// Input for inserting a file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub file_name: String,
    pub file_url: String,
    pub file_type: DocumentSlot,
}

/// Value of one summarized slot: the AI-derived semantic field plus the
/// extracted text and upload it was computed from. `text` stays consistent
/// with `file_id`: both are replaced together or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    pub value: String,
    pub file_id: FileId,
    pub text: String,
}

/// Value of the constitution slot. The option is user-chosen; description
/// and text are derived from the uploaded document when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstitutionValue {
    pub option: ConstitutionOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One company record per user; slots are independently present or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub id: RecordId,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_company_name: Option<SlotValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_company_name_1: Option<SlotValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_company_name_2: Option<SlotValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_activities: Option<SlotValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_registered_address: Option<SlotValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_year_end: Option<SlotValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constitution: Option<ConstitutionValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord {
    /// Create an empty record for a user. Timestamps are set by the store
    /// on write; these are placeholders for in-memory construction.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            user_id,
            intended_company_name: None,
            alternative_company_name_1: None,
            alternative_company_name_2: None,
            company_activities: None,
            intended_registered_address: None,
            financial_year_end: None,
            constitution: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Read a summarized slot by name. Panics if called with the
    /// constitution slot, which has its own shape and accessor.
    pub fn summarized_slot(&self, slot: DocumentSlot) -> Option<&SlotValue> {
        match slot {
            DocumentSlot::IntendedCompanyName => self.intended_company_name.as_ref(),
            DocumentSlot::AlternativeCompanyName1 => self.alternative_company_name_1.as_ref(),
            DocumentSlot::AlternativeCompanyName2 => self.alternative_company_name_2.as_ref(),
            DocumentSlot::CompanyActivities => self.company_activities.as_ref(),
            DocumentSlot::IntendedRegisteredAddress => self.intended_registered_address.as_ref(),
            DocumentSlot::FinancialYearEnd => self.financial_year_end.as_ref(),
            DocumentSlot::Constitution => {
                unreachable!("constitution is not a summarized slot")
            }
        }
    }

    /// Write a summarized slot by name. Same constitution caveat as
    /// [`summarized_slot`](Self::summarized_slot).
    pub fn set_summarized_slot(&mut self, slot: DocumentSlot, value: Option<SlotValue>) {
        match slot {
            DocumentSlot::IntendedCompanyName => self.intended_company_name = value,
            DocumentSlot::AlternativeCompanyName1 => self.alternative_company_name_1 = value,
            DocumentSlot::AlternativeCompanyName2 => self.alternative_company_name_2 = value,
            DocumentSlot::CompanyActivities => self.company_activities = value,
            DocumentSlot::IntendedRegisteredAddress => self.intended_registered_address = value,
            DocumentSlot::FinancialYearEnd => self.financial_year_end = value,
            DocumentSlot::Constitution => {
                unreachable!("constitution is not a summarized slot")
            }
        }
    }

    /// All file ids referenced by populated slots.
    pub fn referenced_file_ids(&self) -> Vec<FileId> {
        let mut ids: Vec<FileId> = SUMMARIZED_SLOTS
            .iter()
            .filter_map(|d| self.summarized_slot(d.slot).map(|v| v.file_id))
            .collect();
        if let Some(c) = &self.constitution {
            if let Some(id) = c.file_id {
                ids.push(id);
            }
        }
        ids
    }

    /// Render the record for API responses, with each slot keyed by its
    /// semantic field and its `fileId` expanded to the full file record.
    pub fn to_populated_json(&self, files: &HashMap<FileId, FileRecord>) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        root.insert("id".into(), serde_json::json!(self.id));
        root.insert("userId".into(), serde_json::json!(self.user_id));

        for descriptor in &SUMMARIZED_SLOTS {
            if let Some(value) = self.summarized_slot(descriptor.slot) {
                let mut slot_json = serde_json::Map::new();
                slot_json.insert(
                    descriptor.semantic_field.into(),
                    serde_json::json!(value.value),
                );
                slot_json.insert("text".into(), serde_json::json!(value.text));
                slot_json.insert("file".into(), file_json(files, value.file_id));
                root.insert(descriptor.wire_name.into(), slot_json.into());
            }
        }

        if let Some(constitution) = &self.constitution {
            let mut slot_json = serde_json::Map::new();
            slot_json.insert("option".into(), serde_json::json!(constitution.option));
            if let Some(description) = &constitution.description {
                slot_json.insert("description".into(), serde_json::json!(description));
            }
            if let Some(text) = &constitution.text {
                slot_json.insert("text".into(), serde_json::json!(text));
            }
            if let Some(file_id) = constitution.file_id {
                slot_json.insert("file".into(), file_json(files, file_id));
            }
            root.insert("constitution".into(), slot_json.into());
        }

        root.insert("createdAt".into(), serde_json::json!(self.created_at));
        root.insert("updatedAt".into(), serde_json::json!(self.updated_at));
        root.into()
    }
}

fn file_json(files: &HashMap<FileId, FileRecord>, id: FileId) -> serde_json::Value {
    match files.get(&id) {
        Some(record) => serde_json::json!(record),
        // Dangling reference; surface the id so the client still sees it.
        None => serde_json::json!(id),
    }
}
