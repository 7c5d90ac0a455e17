//! Admin authentication.
//!
//! Admins sign in with the same email and password as their shopper
//! account. Only users with an active super-admin profile get in.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use jagmart_core::{Email, User};

use crate::db::{RepositoryError, UserRepository};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Valid credentials, but no active super-admin profile.
    #[error("user is not an active super admin")]
    NotAdmin,

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error("password hashing failed")]
    PasswordHash,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct AdminAuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Check credentials and admin rights.
    ///
    /// The password is verified before the admin flag is looked at, so a
    /// wrong password never reveals whether an account is an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password, and `AuthError::NotAdmin` for a valid shopper login.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let credentials = self
            .users
            .credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        if !credentials.is_super_admin || !credentials.user.is_active {
            tracing::warn!(user_id = %credentials.user.id, "Non-admin attempted admin login");
            return Err(AuthError::NotAdmin);
        }

        Ok(credentials.user)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` for short passwords and
/// `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("cold-pressed-oil").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("cold-pressed-oil", &hash).is_ok());
        assert!(matches!(
            verify_password("cold-pressed-ghee", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(hash_password("short"), Err(AuthError::WeakPassword)));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("whatever1", "plaintext"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
