//! Axum route handlers for the cover letter form.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::drafts::form::DraftPatch;
use crate::drafts::generator::{generate_cover_letter, save_cover_letter};
use crate::drafts::session::DraftView;
use crate::errors::AppError;
use crate::models::letter::CoverLetterRecord;
use crate::models::notice::{Notice, LETTER_GENERATED, LETTER_SAVED};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub draft_id: Uuid,
    pub generated_letter: String,
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub letter: CoverLetterRecord,
    pub notice: Notice,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn draft_view(state: &AppState, id: Uuid) -> Result<DraftView, AppError> {
    let has_api_key = state.credentials.contains(id).await;
    state.drafts.view(id, has_api_key).await
}

/// POST /api/v1/drafts
///
/// Opens an empty form.
pub async fn handle_open(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DraftView>), AppError> {
    let id = state.drafts.open(Utc::now()).await;
    Ok((StatusCode::CREATED, Json(draft_view(&state, id).await?)))
}

/// GET /api/v1/drafts/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(draft_view(&state, id).await?))
}

/// PATCH /api/v1/drafts/:id
///
/// Updates the given fields. `apiKey` goes to the credential vault; a blank
/// value clears it.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<DraftView>, AppError> {
    state.drafts.update(id, &patch, &state.credentials).await?;
    Ok(Json(draft_view(&state, id).await?))
}

/// POST /api/v1/drafts/:id/generate
///
/// One provider call per request. While it runs, further generate requests
/// for the same draft get 409.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerateResponse>, AppError> {
    let generated_letter =
        generate_cover_letter(&state.drafts, &state.credentials, state.provider.as_ref(), id)
            .await?;

    Ok(Json(GenerateResponse {
        draft_id: id,
        generated_letter,
        notice: LETTER_GENERATED,
    }))
}

/// POST /api/v1/drafts/:id/save
///
/// Saves the draft's letter as a new record (prepended to the dashboard)
/// and closes the draft.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SaveResponse>), AppError> {
    let letter =
        save_cover_letter(&state.drafts, &state.credentials, &state.letters, id, Utc::now())
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveResponse {
            letter,
            notice: LETTER_SAVED,
        }),
    ))
}

/// DELETE /api/v1/drafts/:id
///
/// Closes the form without saving. An in-flight generation is cancelled.
pub async fn handle_close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.drafts.close(id).await?;
    state.credentials.revoke(id).await;
    Ok(StatusCode::NO_CONTENT)
}
