//! Axum route handlers for the dashboard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::letters::card::CardView;
use crate::letters::reducers::Summary;
use crate::models::letter::CoverLetterRecord;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// What the grid shows when there is nothing to list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
    pub can_create: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: Summary,
    pub query: String,
    pub letters: Vec<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyState>,
}

fn empty_state(query: &str) -> EmptyState {
    if query.is_empty() {
        EmptyState {
            title: "No cover letters yet",
            hint: "Create your first AI-powered cover letter to get started",
            can_create: true,
        }
    } else {
        EmptyState {
            title: "No cover letters found",
            hint: "Try adjusting your search terms",
            can_create: false,
        }
    }
}

/// GET /api/v1/letters?q=
///
/// Counters cover every saved letter; cards are the search matches.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<DashboardResponse> {
    let (summary, matches) = state.letters.search(&params.q).await;
    let letters: Vec<CardView> = matches.iter().map(CardView::from).collect();
    let empty = letters.is_empty().then(|| empty_state(&params.q));

    Json(DashboardResponse {
        summary,
        query: params.q,
        letters,
        empty,
    })
}

/// DELETE /api/v1/letters/:id
///
/// No confirmation, no undo. Unknown ids are a no-op.
pub async fn handle_delete(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.letters.delete(&id).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/letters/:id
pub async fn handle_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CoverLetterRecord>, AppError> {
    Ok(Json(state.letters.view(&id)?))
}

/// POST /api/v1/letters/:id/edit
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CoverLetterRecord>, AppError> {
    Ok(Json(state.letters.edit(&id)?))
}
