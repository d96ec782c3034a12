//! Development seed data command.
//!
//! Inserts a demo seller account and a handful of products so the feed has
//! something to show locally. Idempotent: re-running skips rows that
//! already exist.
//!
//! # Usage
//!
//! ```bash
//! shopreel-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shopreel_core::{MediaKind, UserRole};

const DEMO_EMAIL: &str = "seller@shopreel.test";
const DEMO_PASSWORD: &str = "shopreel-demo-1";
const DEMO_NAME: &str = "Demo Seller";

/// Seed errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

/// Demo products: name, description, price, optional sale price.
const PRODUCTS: &[(&str, &str, i64, Option<i64>)] = &[
    (
        "Vintage Denim Jacket",
        "Stone-washed denim jacket with brass buttons. One of one.",
        5999,
        Some(4499),
    ),
    (
        "Hand-Stitched Leather Wallet",
        "Full-grain leather, six card slots, ages beautifully.",
        3450,
        None,
    ),
    (
        "Ceramic Pour-Over Set",
        "Matte ceramic dripper and carafe, fired in small batches.",
        4200,
        None,
    ),
    (
        "Canvas Tote",
        "Heavy denim-look canvas tote with interior pocket.",
        1899,
        Some(1499),
    ),
];

/// Insert the demo seller and products.
///
/// # Errors
///
/// Returns `SeedError` if `DATABASE_URL` is missing or a query fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let seller_id = ensure_seller(&pool).await?;
    let created = ensure_products(&pool, seller_id).await?;

    tracing::info!(%seller_id, created, "Seed complete");
    tracing::info!("Demo login: {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}

/// Create the demo seller account and profile if they don't exist.
async fn ensure_seller(pool: &PgPool) -> Result<Uuid, SeedError> {
    if let Some((id,)) =
        sqlx::query_as::<_, (Uuid,)>("SELECT id FROM user_account WHERE email = $1")
            .bind(DEMO_EMAIL)
            .fetch_optional(pool)
            .await?
    {
        tracing::info!("Demo seller already exists");
        return Ok(id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map_err(|e| SeedError::PasswordHash(e.to_string()))?
        .to_string();

    let id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO user_account (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(DEMO_EMAIL)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r"
        INSERT INTO user_profile (user_id, name, role, bio, avatar_url)
        VALUES ($1, $2, $3, 'Curated goods for the feed.', $4)
        ",
    )
    .bind(id)
    .bind(DEMO_NAME)
    .bind(UserRole::Seller.as_str())
    .bind("https://ui-avatars.com/api/?name=Demo%20Seller&background=random")
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(%id, "Demo seller created");
    Ok(id)
}

/// Insert the demo products if the seller has none yet.
async fn ensure_products(pool: &PgPool, seller_id: Uuid) -> Result<u64, SeedError> {
    let (existing,) =
        sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM product WHERE creator_id = $1")
            .bind(seller_id)
            .fetch_one(pool)
            .await?;
    if existing > 0 {
        tracing::info!("Demo products already exist");
        return Ok(0);
    }

    let mut created = 0;
    for (name, description, price_cents, sale_cents) in PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO product (id, creator_id, creator_name, creator_avatar_url,
                                 media_url, media_kind, name, description,
                                 price, sale_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(DEMO_NAME)
        .bind("https://ui-avatars.com/api/?name=Demo%20Seller&background=random")
        .bind(format!(
            "https://picsum.photos/seed/{}/800/1200",
            name.to_lowercase().replace(' ', "-")
        ))
        .bind(MediaKind::Image.as_str())
        .bind(name)
        .bind(description)
        .bind(Decimal::new(*price_cents, 2))
        .bind(sale_cents.map(|cents| Decimal::new(cents, 2)))
        .execute(pool)
        .await?;
        created += 1;
    }

    Ok(created)
}
