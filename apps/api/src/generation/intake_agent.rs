//! Conversational intake agent: one chat turn with a structured-extraction tool.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::prompts::INTAKE_AGENT_SYSTEM_TEMPLATE;
use crate::intake::conversation::{ExtractedFields, Extraction};
use crate::llm_client::prompts::string_schema;
use crate::llm_client::{Content, GenerateRequest, LlmClient, LlmResponse, TEXT_MODEL};
use crate::models::chat::{ChatMessage, ChatRole};
use crate::models::intake::IntakeForm;

pub const INTAKE_TOOL_NAME: &str = "collect_intake_data";

pub fn intake_tool() -> Value {
    json!({
        "functionDeclarations": [{
            "name": INTAKE_TOOL_NAME,
            "description": "Extract and save apprenticeship intake information from the conversation.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "title": string_schema(Some("The title of the apprenticeship")),
                    "region": string_schema(Some("Geographic identifier. Cities like \"Fresno\" are regions.")),
                    "industries": string_schema(Some("Comma-separated list of target industries")),
                    "wageRange": string_schema(Some("The typical wage or salary range")),
                    "contactName": string_schema(Some("The primary contact name")),
                    "contactEmail": string_schema(Some("The primary contact email")),
                    "contactPhone": string_schema(Some("The primary contact phone")),
                    "programLink": string_schema(Some("The official program page URL"))
                }
            }
        }]
    })
}

pub fn build_system_instruction(form: &IntakeForm) -> String {
    let snapshot = serde_json::to_string(form).unwrap_or_default();
    INTAKE_AGENT_SYSTEM_TEMPLATE.replace("{form}", &snapshot)
}

pub fn build_contents(history: &[ChatMessage], message: &str) -> Vec<Content> {
    history
        .iter()
        .map(|m| Content::text(m.role.as_str(), m.text.clone()))
        .chain(std::iter::once(Content::text(ChatRole::User.as_str(), message)))
        .collect()
}

/// Folds every `collect_intake_data` call and the reply text into one extraction.
pub fn read_extraction(response: &LlmResponse) -> Result<Extraction, AppError> {
    let mut fields = ExtractedFields::default();
    for call in response.function_calls().filter(|c| c.name == INTAKE_TOOL_NAME) {
        let extracted: ExtractedFields = serde_json::from_value(call.args.clone())
            .map_err(|e| AppError::Llm(format!("Malformed {INTAKE_TOOL_NAME} arguments: {e}")))?;
        debug!("Extracted intake fields: {:?}", extracted);
        fields.absorb(extracted);
    }

    Ok(Extraction {
        fields,
        reply: response.text(),
    })
}

pub async fn extract_intake(
    history: &[ChatMessage],
    message: &str,
    form: &IntakeForm,
    llm: &LlmClient,
) -> Result<Extraction, AppError> {
    let request = GenerateRequest::conversation(build_contents(history, message))
        .system(build_system_instruction(form))
        .tool(intake_tool());

    let response = llm
        .generate(TEXT_MODEL, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Intake chat turn failed: {e}")))?;

    let extraction = read_extraction(&response)?;
    info!(
        "Intake chat turn complete (reply: {})",
        extraction.reply.as_deref().map_or("none", |_| "text")
    );
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_replay_history_then_new_message() {
        let history = vec![ChatMessage::user("Welding"), ChatMessage::model("Which city?")];
        let contents = build_contents(&history, "Fresno");
        let roles: Vec<_> = contents.iter().map(|c| c.role.as_deref().unwrap()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(contents[2].parts[0].text.as_deref(), Some("Fresno"));
    }

    #[test]
    fn test_system_instruction_embeds_form_snapshot() {
        let form = IntakeForm {
            title: "Welding".to_string(),
            ..Default::default()
        };
        let system = build_system_instruction(&form);
        assert!(system.contains(r#""title":"Welding""#));
    }

    #[test]
    fn test_read_extraction_merges_calls_and_ignores_other_tools() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"functionCall": {"name": "collect_intake_data", "args": {"region": "Fresno"}}},
                {"functionCall": {"name": "other_tool", "args": {"title": "ignored"}}},
                {"functionCall": {"name": "collect_intake_data", "args": {"industries": "Energy", "region": null}}}
            ]}}]
        }))
        .unwrap();
        let extraction = read_extraction(&response).unwrap();
        assert_eq!(extraction.fields.region.as_deref(), Some("Fresno"));
        assert_eq!(extraction.fields.industries.as_deref(), Some("Energy"));
        assert!(extraction.fields.title.is_none());
        assert!(extraction.reply.is_none());
    }

    #[test]
    fn test_read_extraction_rejects_malformed_args() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"functionCall": {"name": "collect_intake_data", "args": {"region": 42}}}
            ]}}]
        }))
        .unwrap();
        assert!(matches!(read_extraction(&response), Err(AppError::Llm(_))));
    }
}
