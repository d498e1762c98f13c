//! Integration tests for the intake pipeline against in-memory collaborators.
//!
//! Covers the create/update merge behavior end to end: slot computation,
//! preservation, the constitution option rules, and failure semantics.

use std::sync::Arc;

use intake::testing::{MockBlobStore, MockExtractor, MockSummarizer};
use intake::{
    ConstitutionOption, DocumentSlot, IntakeError, IntakePipeline, MemoryRecordStore, RecordStore,
    Submission, UploadedDocument, UserId,
};

struct Harness {
    pipeline: IntakePipeline,
    summarizer: Arc<MockSummarizer>,
    blobs: Arc<MockBlobStore>,
    store: Arc<MemoryRecordStore>,
}

fn harness() -> Harness {
    harness_with_summarizer(MockSummarizer::new())
}

fn harness_with_summarizer(summarizer: MockSummarizer) -> Harness {
    let summarizer = Arc::new(summarizer);
    let blobs = Arc::new(MockBlobStore::new());
    let store = Arc::new(MemoryRecordStore::new());
    let pipeline = IntakePipeline::new(
        Arc::new(MockExtractor::new()),
        summarizer.clone(),
        blobs.clone(),
        store.clone(),
    );
    Harness {
        pipeline,
        summarizer,
        blobs,
        store,
    }
}

fn doc(slot: DocumentSlot, file_name: &str) -> UploadedDocument {
    UploadedDocument {
        slot,
        file_name: file_name.into(),
        bytes: b"file body".to_vec(),
    }
}

#[tokio::test]
async fn test_create_populates_exactly_the_submitted_slots() {
    let h = harness();
    let user_id = UserId::new();

    let outcome = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: Some(ConstitutionOption::Option2),
                documents: vec![
                    doc(DocumentSlot::CompanyActivities, "activities.pdf"),
                    doc(DocumentSlot::Constitution, "constitution.pdf"),
                ],
            },
        )
        .await
        .unwrap();

    assert!(outcome.created);
    let record = outcome.record;

    let activities = record.company_activities.expect("slot should be populated");
    assert!(activities.value.starts_with("summary:text:activities.pdf"));
    assert!(activities.text.starts_with("text:activities.pdf"));

    let constitution = record.constitution.expect("slot should be populated");
    assert_eq!(constitution.option, ConstitutionOption::Option2);
    assert!(constitution.file_id.is_some());
    assert!(constitution
        .description
        .unwrap()
        .starts_with("summary:text:constitution.pdf"));

    // Others stay absent
    assert!(record.intended_company_name.is_none());
    assert!(record.alternative_company_name_1.is_none());
    assert!(record.alternative_company_name_2.is_none());
    assert!(record.intended_registered_address.is_none());
    assert!(record.financial_year_end.is_none());

    // One summarizer call per uploaded document
    assert_eq!(h.summarizer.call_count(), 2);
    assert_eq!(h.blobs.upload_count(), 2);
}

#[tokio::test]
async fn test_option_only_resubmission_updates_option_in_place() {
    let h = harness();
    let user_id = UserId::new();

    h.pipeline
        .submit(
            user_id,
            Submission {
                option: Some(ConstitutionOption::Option2),
                documents: vec![doc(DocumentSlot::Constitution, "constitution.pdf")],
            },
        )
        .await
        .unwrap();
    let calls_after_create = h.summarizer.call_count();
    let before = h
        .store
        .find_by_user(user_id)
        .await
        .unwrap()
        .unwrap()
        .constitution
        .unwrap();

    let outcome = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: Some(ConstitutionOption::Option3),
                documents: vec![],
            },
        )
        .await
        .unwrap();

    assert!(!outcome.created);
    let after = outcome.record.constitution.unwrap();
    assert_eq!(after.option, ConstitutionOption::Option3);
    assert_eq!(after.file_id, before.file_id);
    assert_eq!(after.description, before.description);
    assert_eq!(after.text, before.text);

    // No new document, no new AI call
    assert_eq!(h.summarizer.call_count(), calls_after_create);
}

#[tokio::test]
async fn test_omitted_slot_is_preserved_on_update() {
    let h = harness();
    let user_id = UserId::new();

    let first = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::CompanyActivities, "activities.pdf")],
            },
        )
        .await
        .unwrap();
    let original = first.record.company_activities.unwrap();

    let second = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::IntendedCompanyName, "name.docx")],
            },
        )
        .await
        .unwrap();

    assert_eq!(second.record.company_activities, Some(original));
    assert!(second.record.intended_company_name.is_some());
}

#[tokio::test]
async fn test_new_file_replaces_slot_value_text_and_reference() {
    let h = harness();
    let user_id = UserId::new();

    let first = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::CompanyActivities, "v1.pdf")],
            },
        )
        .await
        .unwrap();
    let before = first.record.company_activities.unwrap();

    let second = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::CompanyActivities, "v2.pdf")],
            },
        )
        .await
        .unwrap();
    let after = second.record.company_activities.unwrap();

    assert_ne!(after.file_id, before.file_id);
    assert_ne!(after.text, before.text);
    assert_ne!(after.value, before.value);
}

#[tokio::test]
async fn test_identical_content_is_still_a_different_file() {
    // Identity is reference equality on the file id; re-uploading the same
    // bytes creates a new file record and recomputes the slot.
    let h = harness();
    let user_id = UserId::new();

    let first = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::CompanyActivities, "same.pdf")],
            },
        )
        .await
        .unwrap();

    let second = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::CompanyActivities, "same.pdf")],
            },
        )
        .await
        .unwrap();

    assert_ne!(
        second.record.company_activities.unwrap().file_id,
        first.record.company_activities.unwrap().file_id
    );
    assert_eq!(h.summarizer.call_count(), 2);
}

#[tokio::test]
async fn test_constitution_file_without_option_fails_before_staging() {
    let h = harness();

    let err = h
        .pipeline
        .submit(
            UserId::new(),
            Submission {
                option: None,
                documents: vec![
                    doc(DocumentSlot::CompanyActivities, "activities.pdf"),
                    doc(DocumentSlot::Constitution, "constitution.pdf"),
                ],
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_validation());
    // Nothing was uploaded or persisted, attached files included
    assert_eq!(h.blobs.upload_count(), 0);
    assert_eq!(h.store.record_count(), 0);
    assert_eq!(h.store.file_count(), 0);
}

#[tokio::test]
async fn test_unsupported_extension_stores_file_but_skips_summarization() {
    let h = harness();
    let user_id = UserId::new();

    let outcome = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::IntendedCompanyName, "scan.png")],
            },
        )
        .await
        .unwrap();

    // The upload and file record exist; the slot does not.
    assert_eq!(h.store.file_count(), 1);
    assert_eq!(h.summarizer.call_count(), 0);
    assert!(outcome.record.intended_company_name.is_none());
}

#[tokio::test]
async fn test_malformed_summarizer_output_degrades_to_raw_string() {
    let h = harness_with_summarizer(
        MockSummarizer::new().with_response("Extract the name", "Acme Holdings Pte Ltd"),
    );

    let outcome = h
        .pipeline
        .submit(
            UserId::new(),
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::IntendedCompanyName, "name.pdf")],
            },
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.record.intended_company_name.unwrap().value,
        "Acme Holdings Pte Ltd"
    );
}

#[tokio::test]
async fn test_empty_summarizer_value_leaves_slot_absent() {
    let h = harness_with_summarizer(
        MockSummarizer::new().with_response("Extract the name", r#"{"name": ""}"#),
    );

    let outcome = h
        .pipeline
        .submit(
            UserId::new(),
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::IntendedCompanyName, "name.pdf")],
            },
        )
        .await
        .unwrap();

    assert!(outcome.record.intended_company_name.is_none());
}

#[tokio::test]
async fn test_summarizer_failure_aborts_without_persisting_the_record() {
    let h = harness_with_summarizer(MockSummarizer::new().failing());
    let user_id = UserId::new();

    let err = h
        .pipeline
        .submit(
            user_id,
            Submission {
                option: None,
                documents: vec![doc(DocumentSlot::CompanyActivities, "activities.pdf")],
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::Summarize(_)));
    // No record was written, but the staged blob and file record remain
    // (orphan accumulation is accepted).
    assert_eq!(h.store.record_count(), 0);
    assert_eq!(h.store.file_count(), 1);
    assert_eq!(h.blobs.upload_count(), 1);
}

#[tokio::test]
async fn test_fetch_populated_missing_record_is_not_found() {
    let h = harness();
    let err = h.pipeline.fetch_populated(UserId::new()).await.unwrap_err();
    assert!(matches!(err, IntakeError::RecordNotFound));
}

#[tokio::test]
async fn test_fetch_populated_expands_file_references() {
    let h = harness();
    let user_id = UserId::new();

    h.pipeline
        .submit(
            user_id,
            Submission {
                option: Some(ConstitutionOption::Option1),
                documents: vec![
                    doc(DocumentSlot::IntendedRegisteredAddress, "address.docx"),
                    doc(DocumentSlot::Constitution, "constitution.pdf"),
                ],
            },
        )
        .await
        .unwrap();

    let json = h.pipeline.fetch_populated(user_id).await.unwrap();

    let slot = &json["intendedRegisteredAddress"];
    assert!(slot["address"].as_str().unwrap().starts_with("summary:"));
    assert_eq!(
        slot["file"]["fileUrl"],
        "https://blobs.test/kyc_documents/address.docx"
    );
    assert_eq!(slot["file"]["fileType"], "intendedRegisteredAddress");

    assert_eq!(json["constitution"]["option"], 1);
    assert_eq!(
        json["constitution"]["file"]["fileName"],
        "constitution.pdf"
    );
}
