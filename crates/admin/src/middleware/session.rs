//! Session layer for admin.
//!
//! Admin sessions live in `admin.session`, apart from shopper sessions, and
//! use SameSite=Strict with a 24 hour inactivity expiry. Cookies are signed
//! with a key derived from `ADMIN_SESSION_SECRET`.

use argon2::Argon2;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

pub const SESSION_COOKIE_NAME: &str = "jm_admin_session";

const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

const SESSION_SCHEMA: &str = "admin";
const SESSION_TABLE: &str = "session";

const KEY_SALT: &[u8] = b"jagmart-admin-session";

/// Derive the 64-byte cookie signing key from the configured secret.
fn session_key(secret: &SecretString) -> Result<Key, String> {
    let mut material = [0u8; 64];
    Argon2::default()
        .hash_password_into(secret.expose_secret().as_bytes(), KEY_SALT, &mut material)
        .map_err(|e| format!("session key derivation failed: {e}"))?;
    Key::try_from(material.as_slice()).map_err(|e| format!("invalid session key: {e}"))
}

/// # Errors
///
/// Returns an error if the schema or table name is rejected by the store, or
/// the signing key cannot be derived.
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, String> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)
        .map_err(|e| e.to_string())?
        .with_table_name(SESSION_TABLE)
        .map_err(|e| e.to_string())?;
    let key = session_key(&config.session_secret)?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_is_stable_per_secret() {
        let secret = SecretString::from("Zq8#vL2!pR7@kW4$nT9%bY3^cH6&mJ1*");
        let key = session_key(&secret).unwrap();
        assert_eq!(key.master().len(), 64);
        assert_eq!(key.master(), session_key(&secret).unwrap().master());
        assert_ne!(
            key.master(),
            session_key(&SecretString::from("k".repeat(32))).unwrap().master()
        );
    }
}
