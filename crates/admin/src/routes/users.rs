//! User management: listing and activation.

use axum::{
    Json,
    extract::{Path, State},
};

use jagmart_core::{User, UserId};

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::UserPatch;
use crate::state::AppState;

pub async fn list(_admin: RequireAdmin, State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(UserRepository::new(state.pool()).list().await?))
}

pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool()).update(id, &patch).await?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %id,
        is_active = user.is_active,
        "User updated"
    );
    Ok(Json(user))
}
