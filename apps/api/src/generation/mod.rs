// Generation: everything delegated to the external AI provider.
// All model calls go through llm_client; no direct HTTP calls here.

pub mod discovery;
pub mod intake_agent;
pub mod linkedin;
pub mod media;
pub mod outreach;
pub mod profile;
pub mod prompts;
pub mod provider;
