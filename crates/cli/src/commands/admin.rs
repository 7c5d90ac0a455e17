//! Admin account management.
//!
//! # Usage
//!
//! ```bash
//! jm-cli admin create -e owner@jagmart.in -p 'a long passphrase'
//! jm-cli admin grant -e manager@jagmart.in
//! jm-cli admin list
//! ```

use jagmart_admin::db::{RepositoryError, UserRepository};
use jagmart_admin::services::{AuthError, hash_password};
use jagmart_core::{Email, EmailError, User};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{0}")]
    Password(#[from] AuthError),

    #[error("No user with email {0}")]
    UnknownUser(String),

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Connect(String),
}

async fn users_pool() -> Result<sqlx::PgPool, AdminError> {
    super::connect()
        .await
        .map_err(|e| AdminError::Connect(e.to_string()))
}

/// Create a user with the `admin` role and a super-admin profile.
///
/// # Errors
///
/// Returns an error for a malformed email, a short password, or an email
/// that is already registered.
pub async fn create(
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<User, AdminError> {
    let email = Email::parse(email)?;
    let password_hash = hash_password(password)?;

    let pool = users_pool().await?;
    let user = UserRepository::new(&pool)
        .create_admin(&email, &password_hash, first_name, last_name)
        .await?;

    tracing::info!("Admin created! ID: {}, Email: {}", user.id, user.email);
    Ok(user)
}

/// Give an existing user super-admin rights.
///
/// # Errors
///
/// Returns `AdminError::UnknownUser` if nobody has this email.
pub async fn grant(email: &str) -> Result<User, AdminError> {
    let email = Email::parse(email)?;

    let pool = users_pool().await?;
    let user = UserRepository::new(&pool)
        .grant_admin(&email)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UnknownUser(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Admin rights granted to {} (ID {})", user.email, user.id);
    Ok(user)
}

/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn list() -> Result<(), AdminError> {
    let pool = users_pool().await?;
    let admins = UserRepository::new(&pool).list_admins().await?;

    if admins.is_empty() {
        tracing::warn!("No admins yet. Create one with `jm-cli admin create`.");
    }
    for admin in &admins {
        let status = if admin.is_active { "active" } else { "disabled" };
        tracing::info!(
            "{:>5}  {:<40}  {:<24}  {status}",
            admin.id,
            admin.email,
            admin.display_name()
        );
    }
    Ok(())
}
