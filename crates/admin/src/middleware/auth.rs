//! Admin authentication extractor.
//!
//! The session only says who signed in. Every request also re-checks the
//! database, so revoking an admin profile or deactivating the user takes
//! effect immediately.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in, still-authorized admin.
///
/// ```rust,ignore
/// async fn handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

#[derive(Debug)]
pub enum AdminAuthRejection {
    /// No session layer installed, or the admin check could not run.
    Internal,
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Admin sign-in required" })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            tracing::error!("Session layer missing from router");
            return Err(AdminAuthRejection::Internal);
        };

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let allowed = UserRepository::new(state.pool())
            .is_active_super_admin(admin.id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Admin check failed");
                AdminAuthRejection::Internal
            })?;

        if !allowed {
            tracing::info!(user_id = %admin.id, "Admin rights revoked; ending session");
            if let Err(e) = session.flush().await {
                tracing::warn!(error = %e, "Failed to flush revoked admin session");
            }
            return Err(AdminAuthRejection::Unauthorized);
        }

        Ok(Self(admin))
    }
}

/// Store the admin in the session after login.
///
/// The session ID is cycled first so a pre-login session cannot be fixated.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// # Errors
///
/// Returns an error if the session store cannot be reached.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
