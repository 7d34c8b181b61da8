// Shared prompt fragments and schema helpers.
// Each generation service keeps its own prompt text in generation/prompts.rs.

use serde_json::{json, Value};

/// Mandatory disclaimer carried by every outreach package.
pub const OUTREACH_DISCLAIMER: &str = "Participation does not guarantee hiring outcomes; \
    program availability subject to enrollment and eligibility.";

/// `generationConfig` asking for JSON that follows `schema`.
pub fn json_output_config(schema: Value) -> Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": schema,
    })
}

pub fn string_schema(description: Option<&str>) -> Value {
    match description {
        Some(d) => json!({"type": "STRING", "description": d}),
        None => json!({"type": "STRING"}),
    }
}

pub fn string_array_schema(description: Option<&str>) -> Value {
    let mut schema = json!({"type": "ARRAY", "items": {"type": "STRING"}});
    if let Some(d) = description {
        schema["description"] = json!(d);
    }
    schema
}

pub fn number_schema() -> Value {
    json!({"type": "NUMBER"})
}
