//! LinkedIn content calendar: a batch of employer-facing posts.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::LINKEDIN_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{json_output_config, number_schema, string_array_schema, string_schema};
use crate::llm_client::{GenerateRequest, LlmClient, TEXT_MODEL};
use crate::models::linkedin::{ContentPillar, LinkedInPost};
use crate::models::profile::ProgramProfile;
use crate::workflow::posts::normalize_hashtags;

pub const LINKEDIN_BATCH_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default)]
    day: u32,
    #[serde(default)]
    pillar: String,
    content: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

/// `seed` only has to differ between runs so regenerated batches are fresh.
pub fn build_linkedin_prompt(profile: &ProgramProfile, seed: i64) -> String {
    let pillars: Vec<String> = ContentPillar::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} ({})", i + 1, p.label(), p.focus()))
        .collect();
    LINKEDIN_PROMPT_TEMPLATE
        .replace("{count}", &LINKEDIN_BATCH_SIZE.to_string())
        .replace("{title}", &profile.title)
        .replace("{seed}", &seed.to_string())
        .replace("{cta}", profile.cta())
        .replace("{pillars}", &pillars.join("\n"))
}

pub fn linkedin_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "day": number_schema(),
                "pillar": {
                    "type": "STRING",
                    "enum": ContentPillar::ALL.iter().map(|p| p.label()).collect::<Vec<_>>()
                },
                "content": string_schema(None),
                "hashtags": string_array_schema(Some("3-5 relevant hashtags"))
            },
            "required": ["day", "pillar", "content", "hashtags"]
        }
    })
}

/// Unknown pillars fall back to the pillar this slot gets in rotation.
fn normalize_posts(raw: Vec<RawPost>) -> Vec<LinkedInPost> {
    raw.into_iter()
        .enumerate()
        .map(|(i, p)| LinkedInPost {
            day: if p.day == 0 { i as u32 + 1 } else { p.day },
            pillar: ContentPillar::try_from(p.pillar).unwrap_or_else(|e| {
                let fallback = ContentPillar::ALL[i % ContentPillar::ALL.len()];
                warn!("{e}; using '{fallback}' for post {}", i + 1);
                fallback
            }),
            content: p.content,
            hashtags: normalize_hashtags(p.hashtags),
            image_url: None,
        })
        .collect()
}

pub async fn generate_linkedin_calendar(
    profile: &ProgramProfile,
    llm: &LlmClient,
) -> Result<Vec<LinkedInPost>, AppError> {
    let seed = chrono::Utc::now().timestamp_millis();
    let request = GenerateRequest::prompt(build_linkedin_prompt(profile, seed))
        .config(json_output_config(linkedin_schema()));

    let raw: Vec<RawPost> = llm
        .call_json(TEXT_MODEL, &request)
        .await
        .map_err(|e| AppError::Llm(format!("LinkedIn calendar generation failed: {e}")))?;

    let posts = normalize_posts(raw);
    if posts.len() != LINKEDIN_BATCH_SIZE {
        warn!(
            "LinkedIn batch has {} posts (expected {})",
            posts.len(),
            LINKEDIN_BATCH_SIZE
        );
    }
    let missing_cta = posts.iter().filter(|p| !p.content.contains(profile.cta())).count();
    if missing_cta > 0 {
        warn!("{missing_cta} LinkedIn post(s) do not embed the call-to-action");
    }
    info!("Generated {} LinkedIn posts for '{}'", posts.len(), profile.title);
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::fixtures::welding_profile;

    #[test]
    fn test_prompt_embeds_cta_and_all_pillars() {
        let prompt = build_linkedin_prompt(&welding_profile(), 42);
        assert!(prompt.contains("https://college.edu/weld"));
        assert!(prompt.contains("exactly 10"));
        for pillar in ContentPillar::ALL {
            assert!(prompt.contains(pillar.label()));
        }
        assert!(prompt.contains("seed: 42"));
    }

    #[test]
    fn test_posts_normalized() {
        let raw: Vec<RawPost> = serde_json::from_value(json!([
            {"day": 0, "pillar": "Community Impact", "content": "c1", "hashtags": ["#Jobs", "Local"]},
            {"day": 5, "pillar": "Industry Insight", "content": "c2", "hashtags": []}
        ]))
        .unwrap();
        let posts = normalize_posts(raw);
        assert_eq!(posts[0].day, 1);
        assert_eq!(posts[0].hashtags, vec!["Jobs", "Local"]);
        assert_eq!(posts[1].day, 5);
        assert!(posts[1].image_url.is_none());
        assert_eq!(posts[0].pillar, ContentPillar::CommunityImpact);
        assert_eq!(posts[1].pillar, ContentPillar::IndustryInsight);
    }

    #[test]
    fn test_unknown_pillar_falls_back_to_rotation() {
        let raw: Vec<RawPost> = serde_json::from_value(json!([
            {"day": 1, "pillar": "Talent Pipeline", "content": "c1", "hashtags": []},
            {"day": 2, "pillar": "Random Musings", "content": "c2", "hashtags": []},
            {"day": 3, "pillar": "", "content": "c3", "hashtags": []}
        ]))
        .unwrap();
        let posts = normalize_posts(raw);
        assert_eq!(posts[0].pillar, ContentPillar::TalentPipeline);
        assert_eq!(posts[1].pillar, ContentPillar::ALL[1]);
        assert_eq!(posts[2].pillar, ContentPillar::ALL[2]);
    }

    #[test]
    fn test_schema_restricts_pillar_to_labels() {
        let schema = linkedin_schema();
        let labels = schema["items"]["properties"]["pillar"]["enum"].as_array().unwrap().clone();
        assert_eq!(labels.len(), 6);
        assert!(labels.contains(&json!("Diversity & Inclusion")));
    }
}
