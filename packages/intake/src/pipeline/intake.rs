//! The document intake pipeline.
//!
//! Turns a parsed multipart submission into a persisted company record:
//! stage every uploaded file (upload blob → create file record → extract
//! text), resolve each slot through the merge policy, and commit the merged
//! record with a single upsert. Any failure aborts the whole request;
//! blobs and file records staged before the failure are not rolled back.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{IntakeError, Result};
use crate::pipeline::merge::{self, SlotAction};
use crate::pipeline::prompts::{field_prompt, parse_field_response, CONSTITUTION_PROMPT};
use crate::traits::{BlobStore, FieldSummarizer, RecordStore, TextExtractor};
use crate::types::{
    CompanyRecord, ConstitutionValue, DocumentSlot, NewFileRecord, SlotDescriptor, SlotValue,
    StagedFile, Submission, UserId, SUMMARIZED_SLOTS,
};

/// Result of a submission: the persisted record, and whether it was created
/// rather than updated.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub record: CompanyRecord,
    pub created: bool,
}

/// Orchestrates parse → upload → extract → summarize → merge → persist.
///
/// All collaborators are injected as capability traits so the pipeline runs
/// identically against live services and test doubles.
#[derive(Clone)]
pub struct IntakePipeline {
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn FieldSummarizer>,
    blobs: Arc<dyn BlobStore>,
    store: Arc<dyn RecordStore>,
}

impl IntakePipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn FieldSummarizer>,
        blobs: Arc<dyn BlobStore>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            blobs,
            store,
        }
    }

    /// Process a submission for `user_id`, creating or updating their
    /// company record.
    pub async fn submit(&self, user_id: UserId, submission: Submission) -> Result<SubmissionOutcome> {
        submission.validate()?;

        // A constitution document cannot be interpreted without the option
        // choice. Rejecting before staging avoids orphaning its blob.
        if submission.document(DocumentSlot::Constitution).is_some() && submission.option.is_none()
        {
            return Err(IntakeError::validation("constitution option is required"));
        }

        let existing = self.store.find_by_user(user_id).await?;
        let created = existing.is_none();
        info!(%user_id, created, files = submission.documents.len(), "processing submission");

        let staged = self.stage_documents(&submission).await?;

        let mut record = existing
            .clone()
            .unwrap_or_else(|| CompanyRecord::new(user_id));

        record.constitution = self
            .resolve_constitution(
                &submission,
                staged.get(&DocumentSlot::Constitution),
                existing.as_ref().and_then(|r| r.constitution.clone()),
            )
            .await?;

        // The six summarized slots are independent; resolve them together
        // and fail the set on the first error.
        let resolved = futures::future::try_join_all(SUMMARIZED_SLOTS.iter().map(|descriptor| {
            let staged_file = staged.get(&descriptor.slot);
            let existing_slot = existing
                .as_ref()
                .and_then(|r| r.summarized_slot(descriptor.slot))
                .cloned();
            async move {
                let value = self
                    .resolve_slot(descriptor, staged_file, existing_slot.as_ref())
                    .await?;
                Ok::<_, IntakeError>((descriptor.slot, value))
            }
        }))
        .await?;

        for (slot, value) in resolved {
            record.set_summarized_slot(slot, value);
        }

        let record = self.store.upsert(record).await?;
        info!(%user_id, record_id = %record.id, "submission persisted");
        Ok(SubmissionOutcome { record, created })
    }

    /// The caller's record with every slot's file reference expanded, or
    /// [`IntakeError::RecordNotFound`].
    pub async fn fetch_populated(&self, user_id: UserId) -> Result<serde_json::Value> {
        let record = self
            .store
            .find_by_user(user_id)
            .await?
            .ok_or(IntakeError::RecordNotFound)?;
        self.populate(&record).await
    }

    /// Expand a record's file references for an API response.
    pub async fn populate(&self, record: &CompanyRecord) -> Result<serde_json::Value> {
        let files = self.store.get_files(&record.referenced_file_ids()).await?;
        Ok(record.to_populated_json(&files))
    }

    /// Upload every document, create its file record, and extract text where
    /// the format supports it. Slots are staged concurrently.
    async fn stage_documents(
        &self,
        submission: &Submission,
    ) -> Result<HashMap<DocumentSlot, StagedFile>> {
        let staged =
            futures::future::try_join_all(submission.documents.iter().map(|document| async move {
                let url = self
                    .blobs
                    .upload(&document.file_name, &document.bytes)
                    .await?;
                let file = self
                    .store
                    .insert_file(NewFileRecord {
                        file_name: document.file_name.clone(),
                        file_url: url.clone(),
                        file_type: document.slot,
                    })
                    .await?;

                let extension = document.extension().unwrap_or_default();
                let text = if self.extractor.supports(&extension) {
                    Some(
                        self.extractor
                            .extract(&document.file_name, &extension, &document.bytes)
                            .await?,
                    )
                } else {
                    warn!(
                        slot = %document.slot,
                        file = %document.file_name,
                        "unsupported file type for text extraction, slot will not be summarized"
                    );
                    None
                };

                Ok::<_, IntakeError>((
                    document.slot,
                    StagedFile {
                        slot: document.slot,
                        file_id: file.id,
                        file_url: url,
                        text,
                    },
                ))
            }))
            .await?;

        Ok(staged.into_iter().collect())
    }

    /// Resolve one summarized slot through the merge policy.
    async fn resolve_slot(
        &self,
        descriptor: &SlotDescriptor,
        staged: Option<&StagedFile>,
        existing: Option<&SlotValue>,
    ) -> Result<Option<SlotValue>> {
        let action = merge::decide(staged.map(|s| s.file_id), existing.map(|e| e.file_id));
        let staged = match (action, staged) {
            (SlotAction::Absent, _) => return Ok(None),
            (SlotAction::Preserve, _) => return Ok(existing.cloned()),
            (SlotAction::Compute, Some(staged)) => staged,
            // decide() only returns Compute when a file is staged
            (SlotAction::Compute, None) => return Ok(existing.cloned()),
        };

        let Some(text) = staged.text.as_deref() else {
            warn!(slot = %descriptor.slot, "no extracted text, keeping prior slot value");
            return Ok(existing.cloned());
        };

        let prompt = field_prompt(descriptor);
        let response = self.summarizer.summarize(text, &prompt).await?;

        match parse_field_response(&response, descriptor.semantic_field) {
            Some(value) => Ok(Some(SlotValue {
                value,
                file_id: staged.file_id,
                text: text.to_string(),
            })),
            None => {
                warn!(
                    slot = %descriptor.slot,
                    field = descriptor.semantic_field,
                    "summarizer produced no value, slot not written"
                );
                Ok(existing.cloned())
            }
        }
    }

    /// Resolve the constitution slot. The option choice always comes from
    /// the submission; the document-derived parts follow the merge policy.
    async fn resolve_constitution(
        &self,
        submission: &Submission,
        staged: Option<&StagedFile>,
        existing: Option<ConstitutionValue>,
    ) -> Result<Option<ConstitutionValue>> {
        let Some(option) = submission.option else {
            // No option submitted, and no constitution file either since
            // submit() rejected that combination: leave the slot untouched.
            return Ok(existing);
        };

        let action = merge::decide(
            staged.map(|s| s.file_id),
            existing.as_ref().and_then(|e| e.file_id),
        );

        if let (SlotAction::Compute, Some(staged)) = (action, staged) {
            if let Some(text) = staged.text.as_deref() {
                let response = self.summarizer.summarize(text, CONSTITUTION_PROMPT).await?;
                let description = parse_field_response(&response, "description");
                return Ok(Some(ConstitutionValue {
                    option,
                    description,
                    file_id: Some(staged.file_id),
                    text: Some(text.to_string()),
                }));
            }
            warn!("no extracted text for constitution document, keeping prior document state");
        }

        // Preserve / Absent, and Compute without text: keep whatever document
        // state exists and record the newly chosen option.
        Ok(Some(match existing {
            Some(mut value) => {
                value.option = option;
                value
            }
            None => ConstitutionValue {
                option,
                description: None,
                file_id: None,
                text: None,
            },
        }))
    }
}
