//! Outreach package generation for a single employer.

use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::OUTREACH_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{
    json_output_config, string_array_schema, string_schema, OUTREACH_DISCLAIMER,
};
use crate::llm_client::{GenerateRequest, LlmClient, TEXT_MODEL};
use crate::models::employer::{EmployerMatch, OutreachAssets};
use crate::models::profile::ProgramProfile;

pub fn build_outreach_prompt(profile: &ProgramProfile, employer: &EmployerMatch) -> String {
    OUTREACH_PROMPT_TEMPLATE
        .replace("{employer}", &employer.name)
        .replace("{title}", &profile.title)
        .replace("{segment}", employer.segment.label())
        .replace("{region}", &profile.region)
        .replace("{cta}", profile.cta())
        .replace("{disclaimer}", OUTREACH_DISCLAIMER)
}

pub fn outreach_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "primaryEmail": string_schema(Some("140-180 word primary email")),
            "followUps": string_array_schema(Some("3 follow-up emails, 80-120 words each")),
            "callScript": string_array_schema(Some("Bullet points for a call script")),
            "subjectLines": string_array_schema(Some("3 subject line options")),
            "linkedInMessage": string_schema(Some("A tailored, personal LinkedIn outreach message"))
        },
        "required": ["primaryEmail", "followUps", "callScript", "subjectLines", "linkedInMessage"]
    })
}

pub async fn generate_outreach(
    profile: &ProgramProfile,
    employer: &EmployerMatch,
    llm: &LlmClient,
) -> Result<OutreachAssets, AppError> {
    let request = GenerateRequest::prompt(build_outreach_prompt(profile, employer))
        .config(json_output_config(outreach_schema()));

    let assets: OutreachAssets = llm
        .call_json(TEXT_MODEL, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Outreach generation for {} failed: {e}", employer.name)))?;

    info!(
        "Generated outreach for {} ({} follow-ups)",
        employer.name,
        assets.follow_ups.len()
    );
    Ok(assets)
}
