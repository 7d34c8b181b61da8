use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::intake::{FormPatch, IntakeField};
use crate::state::AppState;
use crate::workflow::engine;
use crate::workflow::session::{SessionId, SessionSnapshot};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    /// The field to bring into view.
    pub first_invalid: Option<IntakeField>,
    pub errors: crate::intake::validation::ValidationReport,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize)]
pub struct LaunchRequest {
    pub prompt: String,
}

/// PATCH /api/v1/sessions/:id/form
pub async fn handle_update_form(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(patch): Json<FormPatch>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.form.apply(patch);
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/intake/validate
pub async fn handle_validate(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<ValidateResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let report = session.form.validate().clone();
    Ok(Json(ValidateResponse {
        valid: report.is_valid(),
        first_invalid: report.first_invalid(),
        errors: report,
    }))
}

/// POST /api/v1/sessions/:id/intake/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(engine::submit_intake(&handle, state.ai.as_ref()).await?))
}

/// POST /api/v1/sessions/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(engine::send_chat(&handle, state.ai.as_ref(), &req.message).await?))
}

/// POST /api/v1/sessions/:id/chat/launch
/// Home-screen prompt: opens chat intake with the prompt as the first turn.
pub async fn handle_launch_chat(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<LaunchRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(engine::launch_chat(&handle, state.ai.as_ref(), &req.prompt).await?))
}
