//! Product management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use jagmart_core::{Product, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{ProductInput, ProductListing, ProductPatch, validate_name};
use crate::state::AppState;

pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductListing>>> {
    Ok(Json(ProductRepository::new(state.pool()).list().await?))
}

pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let name = validate_name(&input.name).map_err(AppError::BadRequest)?;
    let product = ProductRepository::new(state.pool())
        .create(name, &input)
        .await?;

    tracing::info!(admin_id = %admin.id, product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let name = patch.validated_name().map_err(AppError::BadRequest)?;
    let product = ProductRepository::new(state.pool())
        .update(id, name, &patch)
        .await?;

    tracing::info!(admin_id = %admin.id, product_id = %id, "Product updated");
    Ok(Json(product))
}

pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).delete(id).await?;

    tracing::info!(admin_id = %admin.id, product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
