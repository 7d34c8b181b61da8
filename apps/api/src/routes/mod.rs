pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::intake::handlers as intake;
use crate::state::AppState;
use crate::workflow::handlers as workflow;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(workflow::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(workflow::handle_get_session).delete(workflow::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/reset", post(workflow::handle_reset))
        .route("/api/v1/sessions/:id/step", put(workflow::handle_go_to))
        // Intake
        .route("/api/v1/sessions/:id/form", patch(intake::handle_update_form))
        .route(
            "/api/v1/sessions/:id/intake/validate",
            post(intake::handle_validate),
        )
        .route(
            "/api/v1/sessions/:id/intake/submit",
            post(intake::handle_submit),
        )
        .route("/api/v1/sessions/:id/chat", post(intake::handle_chat))
        .route(
            "/api/v1/sessions/:id/chat/launch",
            post(intake::handle_launch_chat),
        )
        // Discovery and report
        .route(
            "/api/v1/sessions/:id/discovery",
            post(workflow::handle_discovery),
        )
        .route(
            "/api/v1/sessions/:id/report.csv",
            get(export::handle_report_csv),
        )
        .route(
            "/api/v1/sessions/:id/selection",
            delete(workflow::handle_clear_selection),
        )
        .route(
            "/api/v1/sessions/:id/selection/toggle",
            post(workflow::handle_toggle_selection),
        )
        .route(
            "/api/v1/sessions/:id/selection/toggle-all",
            post(workflow::handle_toggle_all),
        )
        // Outreach
        .route(
            "/api/v1/sessions/:id/outreach",
            post(workflow::handle_build_outreach),
        )
        .route(
            "/api/v1/sessions/:id/outreach/summary",
            get(export::handle_outreach_summary),
        )
        // LinkedIn
        .route(
            "/api/v1/sessions/:id/linkedin",
            post(workflow::handle_generate_linkedin),
        )
        .route(
            "/api/v1/sessions/:id/linkedin/export",
            get(export::handle_linkedin_export),
        )
        .route(
            "/api/v1/sessions/:id/linkedin/hashtags",
            get(export::handle_hashtags),
        )
        .route(
            "/api/v1/sessions/:id/linkedin/:index",
            patch(workflow::handle_update_post),
        )
        .route(
            "/api/v1/sessions/:id/linkedin/:index/graphic",
            post(workflow::handle_generate_graphic),
        )
        // Speech
        .route(
            "/api/v1/sessions/:id/speech/toggle",
            post(workflow::handle_toggle_speech),
        )
        .route(
            "/api/v1/sessions/:id/speech/ended",
            post(workflow::handle_speech_ended),
        )
        .route(
            "/api/v1/sessions/:id/speech/stop",
            post(workflow::handle_stop_speech),
        )
        .with_state(state)
}
