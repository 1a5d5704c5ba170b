use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::{ExportFormat, ExportScope};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub scope: ExportScope,
    /// Candidate ids to export; ignored for the shortlist scope.
    #[serde(default)]
    pub ids: Vec<u64>,
    #[serde(default = "default_format")]
    pub format: ExportFormat,
}

fn default_format() -> ExportFormat {
    ExportFormat::Csv
}

/// POST /api/v1/export
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let today = Utc::now().date_naive();
    let file = state
        .candidates
        .read(|s| {
            let records: Vec<_> = match req.scope {
                ExportScope::Candidates => s
                    .candidates
                    .iter()
                    .filter(|c| req.ids.contains(&c.id))
                    .collect(),
                ExportScope::Shortlist => s.shortlisted.iter().collect(),
            };
            state.export.export(&records, req.scope, req.format, today)
        })
        .await?;

    info!(file = %file.file_name, bytes = file.body.len(), "export generated");
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    )
        .into_response())
}
