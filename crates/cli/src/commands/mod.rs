//! CLI command implementations.

pub mod admin;
pub mod import;
pub mod migrate;

use jagmart_admin::config::database_url_from_env;
use jagmart_admin::db::create_pool;
use sqlx::PgPool;

/// Connect using `ADMIN_DATABASE_URL` or `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = database_url_from_env()?;
    tracing::info!("Connecting to database...");
    Ok(create_pool(&database_url).await?)
}
