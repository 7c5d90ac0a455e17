//! Database migrations.
//!
//! Migrations are embedded from the workspace `migrations/` directory and
//! create every schema the binaries use, including both session tables.
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` or `DATABASE_URL` - `PostgreSQL` connection string

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Connect(String),
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = super::connect()
        .await
        .map_err(|e| MigrationError::Connect(e.to_string()))?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
