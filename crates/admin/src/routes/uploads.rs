//! Image upload.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use jagmart_core::ImageFolder;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::storage::{ImageStore, StoredImage};

/// `POST /api/uploads` with multipart fields `file` and `folder`.
pub async fn upload(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredImage>)> {
    let mut folder: Option<ImageFolder> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("folder") => {
                let value = field.text().await?;
                folder = Some(
                    value
                        .parse()
                        .map_err(|_| AppError::BadRequest(format!("Unknown folder: {value}")))?,
                );
            }
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                file = Some((content_type, field.bytes().await?.to_vec()));
            }
            _ => {}
        }
    }

    let folder = folder.ok_or_else(|| AppError::BadRequest("folder is required".to_string()))?;
    let (content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;

    let stored = state.images().store(folder, &content_type, &bytes).await?;

    tracing::info!(admin_id = %admin.id, path = %stored.path, "Image uploaded");
    Ok((StatusCode::CREATED, Json(stored)))
}
