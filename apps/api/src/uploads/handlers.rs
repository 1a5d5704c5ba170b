use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::extractor::ResumeFile;
use super::tracker::UploadProgress;
use crate::errors::AppError;
use crate::state::AppState;

const UNSUPPORTED_MESSAGE: &str = "Only PDF and DOC/DOCX files are supported";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub uploads: Vec<UploadProgress>,
    /// File names skipped for having an unsupported format.
    pub rejected: Vec<String>,
}

/// POST /api/v1/uploads
/// Every multipart part carrying a file is treated as a resume.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let file = ResumeFile {
            file_name,
            content_type,
            data,
        };
        if file.is_supported() {
            accepted.push(file);
        } else {
            warn!(file = %file.file_name, "rejected unsupported resume format");
            rejected.push(file.file_name);
        }
    }

    if accepted.is_empty() {
        return Err(AppError::Validation(if rejected.is_empty() {
            "No resume files were provided".to_string()
        } else {
            UNSUPPORTED_MESSAGE.to_string()
        }));
    }

    let mut uploads = Vec::with_capacity(accepted.len());
    for file in accepted {
        let progress = state
            .uploads
            .start(file, state.extractor.clone(), state.candidates.clone())
            .await;
        uploads.push(progress);
    }

    Ok((StatusCode::ACCEPTED, Json(UploadResponse { uploads, rejected })))
}

/// GET /api/v1/uploads
pub async fn handle_list_uploads(State(state): State<AppState>) -> Json<Vec<UploadProgress>> {
    Json(state.uploads.list().await)
}

/// GET /api/v1/uploads/:id
pub async fn handle_get_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadProgress>, AppError> {
    state
        .uploads
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Upload {id} not found")))
}

/// DELETE /api/v1/uploads/:id
pub async fn handle_cancel_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.uploads.cancel(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Upload {id} not found")))
    }
}
