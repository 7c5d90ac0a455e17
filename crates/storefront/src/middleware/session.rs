//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The store uses
//! the default `tower_sessions.session` table created by the migrations.
//! Session cookies are signed with a key derived from
//! `STOREFRONT_SESSION_SECRET`.

use argon2::Argon2;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

pub const SESSION_COOKIE_NAME: &str = "jm_session";

/// Sessions expire after 7 days of inactivity.
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Fixed salt so every process derives the same key from the same secret.
const KEY_SALT: &[u8] = b"jagmart-storefront-session";

/// Stretch the configured secret into the 64-byte cookie signing key.
fn session_key(secret: &SecretString) -> Result<Key, String> {
    let mut material = [0u8; 64];
    Argon2::default()
        .hash_password_into(secret.expose_secret().as_bytes(), KEY_SALT, &mut material)
        .map_err(|e| format!("session key derivation failed: {e}"))?;
    Key::try_from(material.as_slice()).map_err(|e| format!("invalid session key: {e}"))
}

/// # Errors
///
/// Returns an error if the signing key cannot be derived.
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, String> {
    let store = PostgresStore::new(pool.clone());
    let key = session_key(&config.session_secret)?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
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
        let a = session_key(&SecretString::from("Zq8#vL2!pR7@kW4$nT9%bY3^cH6&mJ1*")).unwrap();
        let b = session_key(&SecretString::from("Zq8#vL2!pR7@kW4$nT9%bY3^cH6&mJ1*")).unwrap();
        let c = session_key(&SecretString::from("Hx5!tB8@wN2#qL6$rV9%kD3^mZ7&pF4*")).unwrap();

        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
        assert_eq!(a.master().len(), 64);
    }
}
