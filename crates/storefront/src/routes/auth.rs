//! Registration, login, and account handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use jagmart_core::User;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService, Registration};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
///
/// Creates the account and signs it in, like the login endpoint.
#[instrument(skip(state, session, registration), fields(email = %registration.email.trim()))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<User>)> {
    let user = AuthService::new(state.pool())
        .register(&registration)
        .await?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await
        .inspect_err(|e| tracing::info!(error = %e, "Login rejected"))?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "Shopper logged in");

    Ok(Json(user))
}

/// POST /api/auth/logout
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
///
/// `null` for guests, and for sessions whose account was deleted or disabled.
pub async fn me(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
) -> Result<Json<Option<User>>> {
    let Some(current) = current else {
        return Ok(Json(None));
    };

    match AuthService::new(state.pool()).get_user(current.id).await {
        Ok(user) if user.is_active => Ok(Json(Some(user))),
        Ok(_) | Err(AuthError::UserNotFound) => Ok(Json(None)),
        Err(e) => Err(e.into()),
    }
}

/// GET /api/account
pub async fn account(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool())
        .get_user(current.id)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound => AppError::Unauthorized("Please sign in to continue".to_string()),
            other => other.into(),
        })?;

    if !user.is_active {
        return Err(AuthError::AccountDisabled.into());
    }

    Ok(Json(user))
}
