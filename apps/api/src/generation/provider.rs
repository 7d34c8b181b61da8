//! AI provider: the capability interface the workflow talks to.
//!
//! Default: `GeminiProvider` (Gemini `generateContent` via `LlmClient`).
//! `AppState` holds an `Arc<dyn AiProvider>`; tests swap in a scripted one.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;
use crate::generation::{discovery, intake_agent, linkedin, media, outreach, profile};
use crate::intake::conversation::Extraction;
use crate::llm_client::LlmClient;
use crate::models::chat::ChatMessage;
use crate::models::employer::{EmployerMatch, OutreachAssets};
use crate::models::intake::IntakeForm;
use crate::models::linkedin::LinkedInPost;
use crate::models::profile::{EnhanceRequest, ProgramProfile};

/// Every external generative operation the engine depends on. Implement
/// this to swap vendors without touching the workflow or handlers.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn enhance_profile(&self, request: &EnhanceRequest) -> Result<ProgramProfile, AppError>;

    /// Expected to return 50 candidates with unique names.
    async fn discover_employers(&self, profile: &ProgramProfile) -> Result<Vec<EmployerMatch>, AppError>;

    async fn generate_outreach(
        &self,
        profile: &ProgramProfile,
        employer: &EmployerMatch,
    ) -> Result<OutreachAssets, AppError>;

    /// Expected to return 10 posts.
    async fn generate_linkedin_calendar(&self, profile: &ProgramProfile) -> Result<Vec<LinkedInPost>, AppError>;

    /// Returns the image as a `data:` URL.
    async fn generate_post_graphic(
        &self,
        post: &LinkedInPost,
        profile: &ProgramProfile,
    ) -> Result<String, AppError>;

    /// Returns 16-bit little-endian PCM at `SPEECH_SAMPLE_RATE`, mono.
    async fn generate_speech(&self, text: &str) -> Result<Bytes, AppError>;

    /// One conversational intake turn: `history` is the transcript before
    /// `message`; `form` is the current form snapshot.
    async fn extract_intake(
        &self,
        history: &[ChatMessage],
        message: &str,
        form: &IntakeForm,
    ) -> Result<Extraction, AppError>;
}

pub struct GeminiProvider(pub LlmClient);

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn enhance_profile(&self, request: &EnhanceRequest) -> Result<ProgramProfile, AppError> {
        profile::enhance_profile(request, &self.0).await
    }

    async fn discover_employers(&self, profile: &ProgramProfile) -> Result<Vec<EmployerMatch>, AppError> {
        discovery::discover_employers(profile, &self.0).await
    }

    async fn generate_outreach(
        &self,
        profile: &ProgramProfile,
        employer: &EmployerMatch,
    ) -> Result<OutreachAssets, AppError> {
        outreach::generate_outreach(profile, employer, &self.0).await
    }

    async fn generate_linkedin_calendar(&self, profile: &ProgramProfile) -> Result<Vec<LinkedInPost>, AppError> {
        linkedin::generate_linkedin_calendar(profile, &self.0).await
    }

    async fn generate_post_graphic(
        &self,
        post: &LinkedInPost,
        profile: &ProgramProfile,
    ) -> Result<String, AppError> {
        media::generate_post_graphic(post, profile, &self.0).await
    }

    async fn generate_speech(&self, text: &str) -> Result<Bytes, AppError> {
        media::generate_speech(text, &self.0).await
    }

    async fn extract_intake(
        &self,
        history: &[ChatMessage],
        message: &str,
        form: &IntakeForm,
    ) -> Result<Extraction, AppError> {
        intake_agent::extract_intake(history, message, form, &self.0).await
    }
}
