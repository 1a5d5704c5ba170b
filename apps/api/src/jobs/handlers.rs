use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::filter::JobFilter;
use super::reducer::NewJob;
use super::JobAction;
use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Json<Vec<JobPosting>> {
    let jobs: Vec<JobPosting> = state
        .jobs
        .read(|s| filter.apply(&s.jobs).into_iter().cloned().collect())
        .await;
    Json(jobs)
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<NewJob>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    if !req.is_complete() {
        return Err(AppError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let mut created = None;
    state
        .jobs
        .dispatch_with(|s| {
            let job = req.into_posting(s.next_id(), today);
            created = Some(job.clone());
            JobAction::AddJob(job)
        })
        .await;

    let job = created.ok_or_else(|| anyhow::anyhow!("job was not created"))?;
    info!(job_id = job.id, title = %job.title, "job posted");
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<JobPosting>, AppError> {
    state
        .jobs
        .read(|s| s.find(id).cloned())
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// PUT /api/v1/jobs/:id
/// Full replacement; the path id wins over any id in the body.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(mut job): Json<JobPosting>,
) -> StatusCode {
    job.id = id;
    state.jobs.dispatch(JobAction::UpdateJob(job)).await;
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(State(state): State<AppState>, Path(id): Path<u64>) -> StatusCode {
    state.jobs.dispatch(JobAction::DeleteJob(id)).await;
    StatusCode::NO_CONTENT
}
