//! Fixed per-slot prompts for the field summarizer.
//!
//! Each prompt asks for a minimal JSON object holding exactly the slot's
//! semantic field. The pipeline parses that object defensively and falls
//! back to the raw response when the model ignores the instruction.

use crate::types::SlotDescriptor;

/// Prompt for the constitution document's description.
pub const CONSTITUTION_PROMPT: &str = r#"Extract the description in JSON format. Use the schema: {"description": "string"}. Please return only the JSON object without any additional text:"#;

/// Build the prompt for a summarized slot.
pub fn field_prompt(descriptor: &SlotDescriptor) -> String {
    let field = descriptor.semantic_field;
    format!(
        "Extract the {field} in JSON format. Use the schema: {{\"{field}\": \"string\"}}. \
         Please return only the JSON object without any additional text.\n\n\
         Please return only the value for \"{field}\" without any additional formatting."
    )
}

/// Pull the target field out of a summarizer response.
///
/// - Valid JSON with the field present → that value (stringified if the
///   model returned a non-string).
/// - Valid JSON without the field → `None` (field not determined).
/// - Anything that is not JSON → the raw response, verbatim.
///
/// Empty or whitespace-only values collapse to `None` in all cases.
pub fn parse_field_response(response: &str, field: &str) -> Option<String> {
    let value = match serde_json::from_str::<serde_json::Value>(response.trim()) {
        Ok(serde_json::Value::Object(map)) => match map.get(field) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => return None,
            Some(other) => other.to_string(),
        },
        // Non-object JSON (bare string/number) and parse failures both
        // degrade to the raw response
        Ok(serde_json::Value::String(s)) => s,
        Ok(_) | Err(_) => response.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
