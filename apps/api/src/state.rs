use std::sync::Arc;

use crate::config::Config;
use crate::generation::provider::AiProvider;
use crate::workflow::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Generative backend. Default: GeminiProvider.
    pub ai: Arc<dyn AiProvider>,
    #[allow(dead_code)]
    pub config: Config,
}
