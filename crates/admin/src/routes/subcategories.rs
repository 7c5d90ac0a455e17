//! Subcategory management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use jagmart_core::{Subcategory, SubcategoryId};

use crate::db::SubcategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{SubcategoryInput, SubcategoryListing, SubcategoryPatch, validate_name};
use crate::state::AppState;

pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubcategoryListing>>> {
    Ok(Json(SubcategoryRepository::new(state.pool()).list().await?))
}

pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SubcategoryInput>,
) -> Result<(StatusCode, Json<Subcategory>)> {
    let name = validate_name(&input.name).map_err(AppError::BadRequest)?;
    let subcategory = SubcategoryRepository::new(state.pool())
        .create(name, &input)
        .await?;

    tracing::info!(
        admin_id = %admin.id,
        subcategory_id = %subcategory.id,
        category_id = %subcategory.category_id,
        "Subcategory created"
    );
    Ok((StatusCode::CREATED, Json(subcategory)))
}

pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
    Json(patch): Json<SubcategoryPatch>,
) -> Result<Json<Subcategory>> {
    let name = patch.validated_name().map_err(AppError::BadRequest)?;
    let subcategory = SubcategoryRepository::new(state.pool())
        .update(id, name, &patch)
        .await?;

    tracing::info!(admin_id = %admin.id, subcategory_id = %id, "Subcategory updated");
    Ok(Json(subcategory))
}

pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
) -> Result<StatusCode> {
    SubcategoryRepository::new(state.pool()).delete(id).await?;

    tracing::info!(admin_id = %admin.id, subcategory_id = %id, "Subcategory deleted");
    Ok(StatusCode::NO_CONTENT)
}
