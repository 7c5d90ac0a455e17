//! Cart handlers.
//!
//! All routes require a logged-in shopper and respond with the full,
//! refreshed cart.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use jagmart_core::{Cart, CartId, CartLine, ProductId, format_rupees};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::CartService;
use crate::state::AppState;

/// Cart as returned to the client.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub id: CartId,
    pub items: Vec<CartLine>,
    pub item_count: u64,
    pub total: Decimal,
    /// `total` formatted for display, e.g. `₹129.00`.
    pub total_display: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let total = cart.total();
        Self {
            id: cart.id,
            item_count: cart.item_count(),
            total,
            total_display: format_rupees(total),
            items: cart.lines,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

/// GET /api/cart
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool(), user.id).view().await?;
    Ok(Json(cart.into()))
}

/// POST /api/cart/items
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool(), user.id)
        .add(request.product_id, request.quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// PATCH /api/cart/items/{product_id}
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool(), user.id)
        .update_quantity(product_id, request.quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /api/cart/items/{product_id}
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool(), user.id)
        .remove(product_id)
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /api/cart
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool(), user.id).clear().await?;
    Ok(Json(cart.into()))
}
