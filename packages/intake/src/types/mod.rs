//! Domain types for the intake pipeline.

pub mod id;
pub mod record;
pub mod slot;
pub mod submission;

pub use id::{FileId, Id, RecordId, UserId};
pub use record::{CompanyRecord, ConstitutionValue, FileRecord, NewFileRecord, SlotValue};
pub use slot::{ConstitutionOption, DocumentSlot, SlotDescriptor, SUMMARIZED_SLOTS};
pub use submission::{
    StagedFile, Submission, UploadedDocument, ALLOWED_EXTENSIONS, MAX_FILE_BYTES,
};
