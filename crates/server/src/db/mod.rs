//! Database operations for the ShopReel `PostgreSQL` database.
//!
//! # Tables
//!
//! - `user_account` - Email/password authentication
//! - `user_profile` - Display name, role, bio, media URLs, aggregate stats
//! - `product` - Feed posts with denormalized creator snapshots
//! - `product_like` - Liker set (source of truth for like counts)
//! - `comment` - Append-only comment threads, one reply level deep
//! - `tower_sessions` - Session store (managed by tower-sessions)
//!
//! All queries are runtime-checked (`query_as` with `FromRow` row structs)
//! so the workspace builds without a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p shopreel-cli -- migrate
//! ```

pub mod comments;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value could not be interpreted.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
