use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Serialize;

use crate::errors::AppError;
use crate::export::bundles::{linkedin_batch_text, outreach_summary, suggested_hashtags};
use crate::export::report::{match_report_csv, report_filename};
use crate::state::AppState;
use crate::workflow::session::SessionId;

/// Assembled text for the client to place on the clipboard.
#[derive(Serialize)]
pub struct TextBundle {
    pub text: String,
}

/// GET /api/v1/sessions/:id/report.csv
pub async fn handle_report_csv(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<impl IntoResponse, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    let csv = match_report_csv(&session.matches)?;
    let title = session
        .profile
        .as_ref()
        .map(|p| p.title.as_str())
        .unwrap_or("program");
    let disposition = format!("attachment; filename=\"{}\"", report_filename(title));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// GET /api/v1/sessions/:id/outreach/summary
pub async fn handle_outreach_summary(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<TextBundle>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    let text = outreach_summary(
        session.profile.as_ref().map(|p| p.title.as_str()),
        &session.matches,
        &session.selection,
        &session.outreach,
        Local::now().date_naive(),
    )?;
    Ok(Json(TextBundle { text }))
}

/// GET /api/v1/sessions/:id/linkedin/export
pub async fn handle_linkedin_export(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<TextBundle>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    let text = linkedin_batch_text(&session.posts)?;
    Ok(Json(TextBundle { text }))
}

/// GET /api/v1/sessions/:id/linkedin/hashtags
pub async fn handle_hashtags(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Vec<String>>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(suggested_hashtags(session.profile.as_ref())))
}
