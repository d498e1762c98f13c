//! Per-slot merge/preservation policy.
//!
//! For every slot the pipeline decides between recomputing the AI-derived
//! value and keeping what is stored, from three inputs: is a new file
//! staged, does the record already hold the slot, and do the two file
//! identities match. Identity is `FileId` equality; two uploads of
//! byte-identical content are different files.

use crate::types::FileId;

/// What to do with one slot during a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    /// Summarize fresh from the staged file, replacing any stored value.
    Compute,
    /// Keep the stored `{file_id, text, value}` verbatim. When a staged
    /// file carries the same identity this also skips the AI call.
    Preserve,
    /// No staged file and nothing stored; the slot stays unset.
    Absent,
}

/// Decide the action for one slot.
pub fn decide(staged: Option<FileId>, existing: Option<FileId>) -> SlotAction {
    match (staged, existing) {
        (Some(_), None) => SlotAction::Compute,
        (Some(new), Some(old)) if new == old => SlotAction::Preserve,
        (Some(_), Some(_)) => SlotAction::Compute,
        (None, Some(_)) => SlotAction::Preserve,
        (None, None) => SlotAction::Absent,
    }
}
