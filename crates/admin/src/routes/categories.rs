//! Category management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use jagmart_core::{Category, CategoryId};

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{CategoryInput, CategoryPatch, validate_name};
use crate::state::AppState;

pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(CategoryRepository::new(state.pool()).list().await?))
}

pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let name = validate_name(&input.name).map_err(AppError::BadRequest)?;
    let category = CategoryRepository::new(state.pool())
        .create(name, &input)
        .await?;

    tracing::info!(admin_id = %admin.id, category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>> {
    let name = patch.validated_name().map_err(AppError::BadRequest)?;
    let category = CategoryRepository::new(state.pool())
        .update(id, name, &patch)
        .await?;

    tracing::info!(admin_id = %admin.id, category_id = %id, "Category updated");
    Ok(Json(category))
}

pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    CategoryRepository::new(state.pool()).delete(id).await?;

    tracing::info!(admin_id = %admin.id, category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
