use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::filter::CandidateFilter;
use super::CandidateAction;
use crate::errors::AppError;
use crate::models::candidate::CandidateRecord;
use crate::state::AppState;

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(filter): Query<CandidateFilter>,
) -> Json<Vec<CandidateRecord>> {
    let candidates: Vec<CandidateRecord> = state
        .candidates
        .read(|s| filter.apply(&s.candidates).into_iter().cloned().collect())
        .await;
    Json(candidates)
}

/// GET /api/v1/candidates/:id
/// Looks in both the candidate list and the shortlist.
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CandidateRecord>, AppError> {
    state
        .candidates
        .read(|s| s.find(id).cloned())
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

/// POST /api/v1/candidates/:id/shortlist
/// Unknown or already-shortlisted ids are a silent no-op.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> StatusCode {
    state
        .candidates
        .dispatch(CandidateAction::ShortlistCandidate(id))
        .await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/shortlist
pub async fn handle_list_shortlist(State(state): State<AppState>) -> Json<Vec<CandidateRecord>> {
    Json(state.candidates.read(|s| s.shortlisted.clone()).await)
}

/// DELETE /api/v1/shortlist/:id
pub async fn handle_remove_from_shortlist(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> StatusCode {
    state
        .candidates
        .dispatch(CandidateAction::RemoveFromShortlist(id))
        .await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/uploaded
pub async fn handle_list_uploaded(State(state): State<AppState>) -> Json<Vec<CandidateRecord>> {
    Json(state.candidates.read(|s| s.uploaded.clone()).await)
}
