//! Database operations for the admin API.
//!
//! Admin shares the storefront's database and owns the write side of it:
//!
//! - `categories`, `subcategories`, `products` - full CRUD and bulk import
//! - `users`, `roles` - listing and activation
//! - `admin_profiles` - which users may sign in here
//! - `admin.session` - session storage
//!
//! # Migrations
//!
//! Migrations live in the workspace `migrations/` directory and run via:
//! ```bash
//! cargo run -p jagmart-cli -- migrate
//! ```

pub mod categories;
pub mod products;
pub mod subcategories;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use products::ProductRepository;
pub use subcategories::SubcategoryRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate category name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Translate constraint violations into the matching [`RepositoryError`].
///
/// `conflict` is the message for a unique violation, `parent` names the
/// row a foreign key points at.
pub(crate) fn map_constraint(e: sqlx::Error, conflict: &str, parent: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::InvalidReference(format!("{parent} does not exist"));
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Trim optional text, treating blank as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Dairy ")), Some("Dairy"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
