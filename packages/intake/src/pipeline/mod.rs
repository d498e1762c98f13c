//! Intake pipeline: staging, merge policy, and prompts.

pub mod intake;
pub mod merge;
pub mod prompts;

pub use intake::{IntakePipeline, SubmissionOutcome};
pub use merge::{decide, SlotAction};
pub use prompts::{field_prompt, parse_field_response, CONSTITUTION_PROMPT};
