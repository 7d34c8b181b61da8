//! Image and speech synthesis.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{GRAPHIC_PROMPT_TEMPLATE, SPEECH_PROMPT_TEMPLATE};
use crate::llm_client::{GenerateRequest, LlmClient, LlmError, IMAGE_MODEL, SPEECH_MODEL};
use crate::models::linkedin::LinkedInPost;
use crate::models::profile::ProgramProfile;

const GRAPHIC_EXCERPT_CHARS: usize = 300;
const GRAPHIC_ASPECT_RATIO: &str = "1:1";
const SPEECH_VOICE: &str = "Zephyr";

pub fn build_graphic_prompt(post: &LinkedInPost, profile: &ProgramProfile) -> String {
    let excerpt: String = post.content.chars().take(GRAPHIC_EXCERPT_CHARS).collect();
    GRAPHIC_PROMPT_TEMPLATE
        .replace("{pillar}", post.pillar.label())
        .replace("{excerpt}", &excerpt)
        .replace("{title}", &profile.title)
        .replace("{industries}", &profile.industries.join(", "))
}

/// Renders a text-free square graphic for a post, returned as a data URL.
pub async fn generate_post_graphic(
    post: &LinkedInPost,
    profile: &ProgramProfile,
    llm: &LlmClient,
) -> Result<String, AppError> {
    let request = GenerateRequest::prompt(build_graphic_prompt(post, profile))
        .config(json!({"imageConfig": {"aspectRatio": GRAPHIC_ASPECT_RATIO}}));

    let response = llm
        .generate(IMAGE_MODEL, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Graphic generation failed: {e}")))?;

    let image = response
        .inline_data()
        .ok_or_else(|| AppError::Llm(LlmError::MissingInlineData("image").to_string()))?;

    info!("Generated graphic for day {} post", post.day);
    Ok(format!("data:{};base64,{}", image.mime_type, image.data))
}

/// Synthesizes `text` and returns raw 16-bit PCM bytes.
pub async fn generate_speech(text: &str, llm: &LlmClient) -> Result<Bytes, AppError> {
    let request = GenerateRequest::prompt(SPEECH_PROMPT_TEMPLATE.replace("{text}", text)).config(json!({
        "responseModalities": ["AUDIO"],
        "speechConfig": {
            "voiceConfig": {"prebuiltVoiceConfig": {"voiceName": SPEECH_VOICE}}
        }
    }));

    let response = llm
        .generate(SPEECH_MODEL, &request)
        .await
        .map_err(|e| AppError::Llm(format!("Speech synthesis failed: {e}")))?;

    let audio = response
        .inline_data()
        .ok_or_else(|| AppError::Llm(LlmError::MissingInlineData("audio").to_string()))?;

    decode_audio(&audio.data)
}

pub fn decode_audio(data: &str) -> Result<Bytes, AppError> {
    BASE64
        .decode(data.trim())
        .map(Bytes::from)
        .map_err(|e| AppError::Audio(LlmError::Decode(e).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::linkedin::fixtures::post;
    use crate::models::profile::fixtures::welding_profile;

    #[test]
    fn test_graphic_prompt_truncates_content_on_char_boundary() {
        let mut p = post(1);
        p.content = "é".repeat(400);
        let prompt = build_graphic_prompt(&p, &welding_profile());
        assert!(prompt.contains(&"é".repeat(300)));
        assert!(!prompt.contains(&"é".repeat(301)));
        assert!(prompt.contains("Advanced Manufacturing, Energy"));
    }

    #[test]
    fn test_decode_audio() {
        assert_eq!(decode_audio("AAEC").unwrap(), Bytes::from_static(&[0, 1, 2]));
        assert!(matches!(decode_audio("***"), Err(AppError::Audio(_))));
    }
}
