//! Spreadsheet import.

use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::import::{ImportReport, import_workbook};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub dry_run: bool,
}

/// `POST /api/import[?dry_run=true]` with the workbook in multipart field `file`.
///
/// Rejected imports answer 422 with the report, so the client gets every
/// row error at once.
pub async fn import(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportReport>)> {
    let mut workbook = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            workbook = Some(field.bytes().await?);
        }
    }
    let workbook = workbook.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;

    let report = import_workbook(state.pool(), state.images(), &workbook, query.dry_run).await?;

    let status = if !report.applied && !report.errors.is_empty() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };

    tracing::info!(
        admin_id = %admin.id,
        applied = report.applied,
        errors = report.errors.len(),
        "Import finished"
    );
    Ok((status, Json(report)))
}
