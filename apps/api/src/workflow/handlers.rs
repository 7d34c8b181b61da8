use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::linkedin::PostUpdate;
use crate::state::AppState;
use crate::workflow::engine::{self, SpeechOutcome};
use crate::workflow::session::{SessionId, SessionSnapshot};
use crate::workflow::speech::SpeechState;
use crate::workflow::step::Step;

#[derive(Deserialize)]
pub struct StepRequest {
    pub step: Step,
}

#[derive(Deserialize)]
pub struct EmployerRequest {
    pub employer: String,
}

#[derive(Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackEnded {
    pub playback_id: u64,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let handle = state.sessions.create().await;
    let snapshot = handle.lock().await.snapshot();
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let snapshot = handle.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/reset
/// Confirmation happens client-side; this clears everything unconditionally.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.reset();
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/sessions/:id/step
pub async fn handle_go_to(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<StepRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.go_to(req.step);
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/discovery
pub async fn handle_discovery(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(engine::run_discovery(&handle, state.ai.as_ref()).await?))
}

/// POST /api/v1/sessions/:id/selection/toggle
pub async fn handle_toggle_selection(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<EmployerRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    if !session.matches.iter().any(|m| m.name == req.employer) {
        return Err(AppError::NotFound(format!(
            "Employer '{}' is not in the match report",
            req.employer
        )));
    }
    session.selection.toggle(&req.employer);
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/selection/toggle-all
pub async fn handle_toggle_all(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    session.selection.toggle_all(&session.matches);
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/sessions/:id/selection
pub async fn handle_clear_selection(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.selection.clear();
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/outreach
pub async fn handle_build_outreach(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<EmployerRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(
        engine::build_outreach(&handle, state.ai.as_ref(), &req.employer).await?,
    ))
}

/// POST /api/v1/sessions/:id/linkedin
pub async fn handle_generate_linkedin(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(engine::generate_linkedin(&handle, state.ai.as_ref()).await?))
}

/// PATCH /api/v1/sessions/:id/linkedin/:index
pub async fn handle_update_post(
    State(state): State<AppState>,
    Path((id, index)): Path<(SessionId, usize)>,
    Json(update): Json<PostUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.posts.update(index, update)?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/linkedin/:index/graphic
pub async fn handle_generate_graphic(
    State(state): State<AppState>,
    Path((id, index)): Path<(SessionId, usize)>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(
        engine::generate_graphic(&handle, state.ai.as_ref(), index).await?,
    ))
}

/// POST /api/v1/sessions/:id/speech/toggle
pub async fn handle_toggle_speech(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<SpeechRequest>,
) -> Result<Json<SpeechOutcome>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(
        engine::toggle_speech(&handle, state.ai.as_ref(), &req.text).await?,
    ))
}

/// POST /api/v1/sessions/:id/speech/ended
/// Reported by the client when a clip finishes; stale ids are ignored.
pub async fn handle_speech_ended(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<PlaybackEnded>,
) -> Result<Json<SpeechState>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.speech.ended(req.playback_id);
    Ok(Json(session.speech.state().clone()))
}

/// POST /api/v1/sessions/:id/speech/stop
pub async fn handle_stop_speech(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SpeechState>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.speech.stop();
    Ok(Json(session.speech.state().clone()))
}
