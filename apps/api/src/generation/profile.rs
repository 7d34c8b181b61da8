//! Profile enhancement: turns a submitted intake form into a `ProgramProfile`.

use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::ENHANCE_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{json_output_config, string_array_schema, string_schema};
use crate::llm_client::{GenerateRequest, LlmClient, PROFILE_MODEL};
use crate::models::profile::{EnhanceRequest, ProgramProfile};

const NOT_PROVIDED: &str = "Not provided";

pub fn build_enhance_prompt(req: &EnhanceRequest) -> String {
    let contact = &req.primary_contact_info;
    ENHANCE_PROMPT_TEMPLATE
        .replace("{title}", &req.title)
        .replace("{region}", &req.region)
        .replace("{industries}", &req.industries.join(", "))
        .replace("{url}", req.cta_link.as_deref().unwrap_or("None provided"))
        .replace("{contact_name}", contact.name.as_deref().unwrap_or(NOT_PROVIDED))
        .replace("{contact_email}", contact.email.as_deref().unwrap_or(NOT_PROVIDED))
        .replace("{contact_phone}", contact.phone.as_deref().unwrap_or(NOT_PROVIDED))
}

pub fn profile_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": string_schema(None),
            "region": string_schema(None),
            "industries": string_array_schema(None),
            "elevatorPitch": string_schema(None),
            "geoAnalytics": string_schema(Some("Economic and labor market overview of the region")),
            "wageRange": string_schema(None),
            "primaryContactInfo": {
                "type": "OBJECT",
                "properties": {
                    "name": string_schema(None),
                    "email": string_schema(None),
                    "phone": string_schema(None)
                }
            },
            "siteSummary": string_schema(Some("Brief summary of the provided URL content")),
            "safetyAssessment": string_schema(Some("Evaluation of safety training requirements")),
            "skills": {
                "type": "OBJECT",
                "properties": {
                    "hard": string_array_schema(None),
                    "soft": string_array_schema(None)
                },
                "required": ["hard", "soft"]
            },
            "credentials": string_array_schema(None),
            "targetJobTitles": string_array_schema(None),
            "startDate": string_schema(None),
            "ctaLink": string_schema(None),
            "suggestions": string_array_schema(None)
        },
        "required": [
            "title", "region", "industries", "elevatorPitch", "geoAnalytics", "wageRange",
            "safetyAssessment", "skills", "targetJobTitles", "startDate", "suggestions"
        ]
    })
}

/// Fills gaps the model left with what the user already gave us.
fn backfill(mut profile: ProgramProfile, req: &EnhanceRequest) -> ProgramProfile {
    let given = &req.primary_contact_info;
    let contact = &mut profile.primary_contact_info;
    contact.name = contact.name.take().or_else(|| given.name.clone());
    contact.email = contact.email.take().or_else(|| given.email.clone());
    contact.phone = contact.phone.take().or_else(|| given.phone.clone());

    if profile.cta_link.as_deref().map_or(true, |l| l.trim().is_empty()) {
        profile.cta_link = req.cta_link.clone();
    }
    if profile.wage_range.is_none() {
        profile.wage_range = req.wage_range.clone();
    }
    if profile.start_date.trim().is_empty() {
        profile.start_date = req.start_date.clone();
    }
    profile
}

/// Enhances the intake data into a full profile (web search enabled so a
/// program link can be read).
pub async fn enhance_profile(req: &EnhanceRequest, llm: &LlmClient) -> Result<ProgramProfile, AppError> {
    let request = GenerateRequest::prompt(build_enhance_prompt(req))
        .tool(json!({"googleSearch": {}}))
        .config(json_output_config(profile_schema()));

    let profile: ProgramProfile = llm
        .call_json(PROFILE_MODEL, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Profile enhancement failed: {e}")))?;

    info!(
        "Enhanced profile '{}' ({} target titles)",
        profile.title,
        profile.target_job_titles.len()
    );
    Ok(backfill(profile, req))
}
