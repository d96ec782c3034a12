//! Session layer configuration.
//!
//! Sessions are stored in Postgres and referenced by a signed cookie, so a
//! tampered session ID fails verification instead of reaching the store. The
//! session record holds the signed-in user snapshot and the cart.

use cookie::Key;
use secrecy::ExposeSecret;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Session cookie name.
const SESSION_COOKIE: &str = "shopreel_session";

/// Sessions expire after this much inactivity.
const SESSION_INACTIVITY_DAYS: i64 = 7;

/// Build the session manager layer.
///
/// The cookie is signed with a key derived from the configured session
/// secret (config validation guarantees at least the 32 bytes the derivation
/// requires). It is `Secure` whenever the public base URL is HTTPS, and
/// `SameSite=Lax` so the cross-origin frontend can send it on top-level
/// navigations while still blocking cross-site POSTs.
pub fn session_layer(
    store: PostgresStore,
    config: &ServerConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    let secure = config.base_url.starts_with("https://");
    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            SESSION_INACTIVITY_DAYS,
        )))
        .with_signed(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use sqlx::PgPool;

    use super::*;
    use crate::config::{ServerConfig, StripeConfig};

    fn test_config(session_secret: &str) -> ServerConfig {
        ServerConfig {
            database_url: "postgres://localhost/shopreel".to_string().into(),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://shopreel.test".to_string(),
            session_secret: session_secret.to_string().into(),
            media_root: PathBuf::from("/tmp/shopreel-media"),
            stripe: StripeConfig {
                secret_key: "sk_test_4eC39HqLyjWDarjtT1zdp7dc".to_string().into(),
                publishable_key: "pk_test_TYooMQauvdEDq54NiTphI7jx".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[tokio::test]
    async fn test_session_layer_derives_key_from_minimum_length_secret() {
        // Key derivation panics below 32 bytes; the config validator enforces
        // that minimum, so a secret right at the boundary must build cleanly.
        let config = test_config("wJ3kP9xQ7mR2nT5vL8cF4hD6sA1gE0yB");
        let pool = PgPool::connect_lazy("postgres://localhost/shopreel").unwrap();
        let _layer = session_layer(PostgresStore::new(pool), &config);
    }
}
