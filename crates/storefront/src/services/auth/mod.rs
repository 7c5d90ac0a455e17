//! Authentication service.
//!
//! Email and password accounts for shoppers. Passwords are hashed with
//! Argon2id; the session layer keeps the user logged in afterwards.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use jagmart_core::{Email, User, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 256;
const MAX_NAME_LENGTH: usize = 100;

/// Registration form input.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new shopper.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;
        let first_name = normalize_name(registration.first_name.as_deref())?;
        let last_name = normalize_name(registration.last_name.as_deref())?;

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .users
            .create_customer(&NewUser {
                email: &email,
                password_hash: &password_hash,
                first_name,
                last_name,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Shopper registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountDisabled` if an admin deactivated the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user no longer exists.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Trim an optional name, treating blank input as absent.
fn normalize_name(name: Option<&str>) -> Result<Option<&str>, AuthError> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AuthError::InvalidName(format!(
            "names must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(Some(name))
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
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
    fn test_password_length_rules() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("eight chr").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("basmati-rice-5kg").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("basmati-rice-5kg", &hash).is_ok());
        assert!(matches!(
            verify_password("basmati-rice-1kg", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some("  Meera ")).unwrap(), Some("Meera"));
        assert_eq!(normalize_name(Some("   ")).unwrap(), None);
        assert_eq!(normalize_name(None).unwrap(), None);
        assert!(normalize_name(Some(&"n".repeat(101))).is_err());
    }
}
