//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] jagmart_core::EmailError),

    /// Wrong password or unknown email. The two are deliberately not
    /// distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("password validation failed: {0}")]
    WeakPassword(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("password hashing error")]
    PasswordHash,
}
