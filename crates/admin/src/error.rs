//! Error handling for admin routes.
//!
//! Handlers return `Result<T, AppError>`. Responses are JSON
//! `{"error": "..."}`; server faults go to Sentry and are never described to
//! the client.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::import::ImportError;
use crate::services::AuthError;
use crate::storage::StorageError;

const INTERNAL: &str = "Internal server error";

/// Shown to anyone who signs in without admin rights.
pub const NOT_ADMIN_MESSAGE: &str = "Unauthorized access. Admin privileges required.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn repository_message(err: &RepositoryError) -> String {
    match err {
        RepositoryError::NotFound => "Not found".to_string(),
        RepositoryError::Conflict(msg) | RepositoryError::InvalidReference(msg) => msg.clone(),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => INTERNAL.to_string(),
    }
}

const fn storage_status(err: &StorageError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(err) => repository_status(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::NotAdmin => StatusCode::FORBIDDEN,
                AuthError::WeakPassword => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Import(err) => match err {
                ImportError::Workbook(_) => StatusCode::BAD_REQUEST,
                ImportError::Repository(err) => repository_status(err),
                ImportError::Storage(err) => storage_status(err),
            },
            Self::Storage(err) => storage_status(err),
            Self::Multipart(err) => err.status(),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Never includes internal error text.
    fn public_message(&self) -> String {
        if self.status().is_server_error() {
            return INTERNAL.to_string();
        }
        match self {
            Self::Database(err) | Self::Import(ImportError::Repository(err)) => {
                repository_message(err)
            }
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_string(),
            Self::Auth(AuthError::NotAdmin) => NOT_ADMIN_MESSAGE.to_string(),
            Self::Import(ImportError::Workbook(msg)) => {
                format!("Could not read the spreadsheet: {msg}")
            }
            Self::NotFound(what) => format!("{what} not found"),
            Self::BadRequest(msg) => msg.clone(),
            other => other.source_message(),
        }
    }

    /// Message of the wrapped error, for the client-error cases without a
    /// dedicated wording.
    fn source_message(&self) -> String {
        match self {
            Self::Auth(err) => err.to_string(),
            Self::Import(ImportError::Storage(err)) | Self::Storage(err) => err.to_string(),
            Self::Multipart(err) => err.body_text(),
            _ => INTERNAL.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with the signed-in admin.
pub fn set_sentry_user(user_id: &impl ToString, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
