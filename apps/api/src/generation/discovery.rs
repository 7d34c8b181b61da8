//! Employer discovery: scores candidate employers for a profile.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::DISCOVERY_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{json_output_config, number_schema, string_schema};
use crate::llm_client::{GenerateRequest, LlmClient, TEXT_MODEL};
use crate::models::employer::{EmployerMatch, OutreachSegment};
use crate::models::profile::ProgramProfile;

/// Number of candidates requested per discovery run.
pub const DISCOVERY_BATCH_SIZE: usize = 50;

/// Match as the model returns it; the segment is parsed leniently afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    name: String,
    score: f64,
    #[serde(default)]
    rationale: String,
    #[serde(default)]
    segment: String,
    #[serde(default)]
    industry_alignment: f64,
    #[serde(default)]
    job_title_overlap: f64,
    #[serde(default)]
    skill_overlap: f64,
    #[serde(default)]
    geographic_proximity: f64,
    #[serde(default)]
    hiring_signals: f64,
    website: Option<String>,
    phone: Option<String>,
    contact_email: Option<String>,
}

pub fn build_discovery_prompt(profile: &ProgramProfile) -> String {
    let segments: Vec<&str> = OutreachSegment::ALL.iter().map(|s| s.label()).collect();
    DISCOVERY_PROMPT_TEMPLATE
        .replace("{title}", &profile.title)
        .replace("{industries}", &profile.industries.join(", "))
        .replace("{region}", &profile.region)
        .replace("{job_titles}", &profile.target_job_titles.join(", "))
        .replace("{count}", &DISCOVERY_BATCH_SIZE.to_string())
        .replace("{segments}", &segments.join(", "))
}

pub fn discovery_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": string_schema(None),
                "score": number_schema(),
                "rationale": string_schema(None),
                "segment": {
                    "type": "STRING",
                    "enum": OutreachSegment::ALL.iter().map(|s| s.label()).collect::<Vec<_>>()
                },
                "industryAlignment": number_schema(),
                "jobTitleOverlap": number_schema(),
                "skillOverlap": number_schema(),
                "geographicProximity": number_schema(),
                "hiringSignals": number_schema(),
                "website": string_schema(None),
                "phone": string_schema(None),
                "contactEmail": string_schema(None)
            },
            "required": [
                "name", "score", "rationale", "segment", "industryAlignment",
                "jobTitleOverlap", "skillOverlap", "geographicProximity", "hiringSignals"
            ]
        }
    })
}

fn clamp_score(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Enforces the match invariants: unique non-blank names (first occurrence
/// wins), scores within 0..=100, a known segment.
fn normalize_matches(raw: Vec<RawMatch>) -> Vec<EmployerMatch> {
    let mut seen = HashSet::new();
    let mut matches = Vec::with_capacity(raw.len());

    for m in raw {
        let name = m.name.trim().to_string();
        if name.is_empty() || !seen.insert(name.clone()) {
            warn!("Dropping blank or duplicate employer '{}'", name);
            continue;
        }
        let segment = OutreachSegment::try_from(m.segment).unwrap_or_else(|e| {
            warn!("{e}; defaulting '{name}' to {}", OutreachSegment::TalentPipeline);
            OutreachSegment::TalentPipeline
        });

        matches.push(EmployerMatch {
            name,
            score: clamp_score(m.score),
            rationale: m.rationale,
            segment,
            industry_alignment: clamp_score(m.industry_alignment),
            job_title_overlap: clamp_score(m.job_title_overlap),
            skill_overlap: clamp_score(m.skill_overlap),
            geographic_proximity: clamp_score(m.geographic_proximity),
            hiring_signals: clamp_score(m.hiring_signals),
            website: non_blank(m.website),
            phone: non_blank(m.phone),
            contact_email: non_blank(m.contact_email),
        });
    }
    matches
}

pub async fn discover_employers(
    profile: &ProgramProfile,
    llm: &LlmClient,
) -> Result<Vec<EmployerMatch>, AppError> {
    let request = GenerateRequest::prompt(build_discovery_prompt(profile))
        .config(json_output_config(discovery_schema()));

    let raw: Vec<RawMatch> = llm
        .call_json(TEXT_MODEL, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Employer discovery failed: {e}")))?;

    let matches = normalize_matches(raw);
    if matches.len() != DISCOVERY_BATCH_SIZE {
        warn!(
            "Discovery returned {} employers (expected {})",
            matches.len(),
            DISCOVERY_BATCH_SIZE
        );
    }
    info!("Discovered {} employers for '{}'", matches.len(), profile.title);
    Ok(matches)
}
