//! Admin sign-in routes.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let user = AdminAuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await
        .inspect_err(|e| tracing::info!(error = %e, "Admin login rejected"))?;

    let admin = CurrentAdmin::from(&user);
    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.id, admin.email.as_str());

    tracing::info!(user_id = %admin.id, "Admin signed in");
    Ok(Json(admin))
}

pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<CurrentAdmin> {
    Json(admin)
}
