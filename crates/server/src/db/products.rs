//! Product repository for feed, detail, creator, and like queries.
//!
//! Every product read computes the viewer-dependent fields (`liked_by_viewer`)
//! and the derived comment count in SQL, so callers always get a complete
//! [`Product`]. The like toggle runs as a single transaction that keeps the
//! denormalized counters consistent with the liker set.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shopreel_core::{CurrencyCode, MediaKind, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::product::{CreatorSnapshot, Product};

/// Row shape for product queries, including derived columns.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    creator_id: Uuid,
    creator_name: String,
    creator_avatar_url: String,
    media_url: String,
    media_kind: String,
    name: String,
    description: String,
    price: Decimal,
    sale_price: Option<Decimal>,
    like_count: i64,
    comment_count: i64,
    liked_by_viewer: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::from_uuid(row.id),
            creator: CreatorSnapshot {
                id: UserId::from_uuid(row.creator_id),
                name: row.creator_name,
                avatar_url: row.creator_avatar_url,
            },
            media_url: row.media_url,
            media_kind: MediaKind::from_db(&row.media_kind),
            name: row.name,
            description: row.description,
            price: Price::from_stored(row.price, CurrencyCode::USD),
            sale_price: row
                .sale_price
                .map(|amount| Price::from_stored(amount, CurrencyCode::USD)),
            like_count: row.like_count,
            comment_count: row.comment_count,
            liked_by_viewer: row.liked_by_viewer,
            created_at: row.created_at,
        }
    }
}

/// Base SELECT shared by all product reads. `$1` is the optional viewer ID.
const SELECT_PRODUCT: &str = r"
    SELECT p.id, p.creator_id, p.creator_name, p.creator_avatar_url,
           p.media_url, p.media_kind, p.name, p.description,
           p.price, p.sale_price, p.like_count, p.created_at,
           (SELECT COUNT(*) FROM comment c WHERE c.product_id = p.id) AS comment_count,
           ($1::uuid IS NOT NULL AND EXISTS (
               SELECT 1 FROM product_like l
               WHERE l.product_id = p.id AND l.user_id = $1
           )) AS liked_by_viewer
    FROM product p
";

/// Escape `ILIKE` wildcard characters so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub creator: CreatorSnapshot,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub sale_price: Option<Price>,
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy)]
pub struct LikeOutcome {
    /// Whether the user likes the product after the toggle.
    pub liked: bool,
    /// Like count after the toggle.
    pub like_count: i64,
}

/// Net effect of a like toggle on the liker set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeChange {
    Added,
    Removed,
    /// Neither the insert nor the delete changed a row: a concurrent toggle
    /// got there first, and already adjusted the counters.
    None,
}

const fn like_change(inserted: u64, deleted: u64) -> LikeChange {
    if inserted == 1 {
        LikeChange::Added
    } else if deleted == 1 {
        LikeChange::Removed
    } else {
        LikeChange::None
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            WITH inserted AS (
                INSERT INTO product (id, creator_id, creator_name, creator_avatar_url,
                                     media_url, media_kind, name, description,
                                     price, sale_price)
                VALUES ($2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            {}
            ",
            SELECT_PRODUCT.replace("FROM product p", "FROM inserted p"),
        ))
        .bind(Option::<Uuid>::None)
        .bind(Uuid::new_v4())
        .bind(new.creator.id.as_uuid())
        .bind(&new.creator.name)
        .bind(&new.creator.avatar_url)
        .bind(&new.media_url)
        .bind(new.media_kind.as_str())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price.amount)
        .bind(new.sale_price.map(|p| p.amount))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List all products, newest first, for the feed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_feed(&self, viewer: Option<UserId>) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} ORDER BY p.created_at DESC",
        ))
        .bind(viewer.map(|id| id.as_uuid()))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: ProductId,
        viewer: Option<UserId>,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE p.id = $2"))
            .bind(viewer.map(|v| v.as_uuid()))
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// List a creator's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_creator(
        &self,
        creator_id: UserId,
        viewer: Option<UserId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE p.creator_id = $2 ORDER BY p.created_at DESC",
        ))
        .bind(viewer.map(|v| v.as_uuid()))
        .bind(creator_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List products a user has liked, most recently liked first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_liked_by(
        &self,
        user_id: UserId,
        viewer: Option<UserId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            {SELECT_PRODUCT}
            JOIN product_like pl ON pl.product_id = p.id
            WHERE pl.user_id = $2
            ORDER BY pl.created_at DESC
            ",
        ))
        .bind(viewer.map(|v| v.as_uuid()))
        .bind(user_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Search products by case-insensitive substring on name or description,
    /// newest first.
    ///
    /// The query must already be normalized (trimmed, lowercased, non-empty);
    /// `ILIKE` wildcards in user input are escaped so they match literally.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        query: &str,
        viewer: Option<UserId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            {SELECT_PRODUCT}
            WHERE p.name ILIKE $2 OR p.description ILIKE $2
            ORDER BY p.created_at DESC
            ",
        ))
        .bind(viewer.map(|v| v.as_uuid()))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete a product owned by `owner`.
    ///
    /// Returns the deleted product's media URL so the caller can clean up
    /// the stored file, or `None` if no matching row was owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(
        &self,
        id: ProductId,
        owner: UserId,
    ) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query_as::<_, (String,)>(
            r"
            DELETE FROM product
            WHERE id = $1 AND creator_id = $2
            RETURNING media_url
            ",
        )
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(media_url,)| media_url))
    }

    /// Toggle a user's like on a product.
    ///
    /// The liker-set row, the product's `like_count`, and the creator's
    /// aggregate `likes` are all updated in one transaction, so the counters
    /// can never drift from the liker set under concurrent toggles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn toggle_like(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<LikeOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r"
            INSERT INTO product_like (product_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (product_id, user_id) DO NOTHING
            ",
        )
        .bind(product_id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?
        .rows_affected();

        let deleted = if inserted == 1 {
            0
        } else {
            sqlx::query("DELETE FROM product_like WHERE product_id = $1 AND user_id = $2")
                .bind(product_id.as_uuid())
                .bind(user_id.as_uuid())
                .execute(&mut *tx)
                .await?
                .rows_affected()
        };

        // Only adjust the counters for the rows this transaction actually
        // changed; a delete that raced another unlike must not decrement.
        let change = like_change(inserted, deleted);
        let delta = match change {
            LikeChange::Added => "like_count + 1",
            LikeChange::Removed => "GREATEST(like_count - 1, 0)",
            LikeChange::None => "like_count",
        };
        let (like_count, creator_id) = sqlx::query_as::<_, (i64, Uuid)>(&format!(
            "UPDATE product SET like_count = {delta} WHERE id = $1 RETURNING like_count, creator_id",
        ))
        .bind(product_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if change != LikeChange::None {
            let profile_delta = match change {
                LikeChange::Added => "likes + 1",
                _ => "GREATEST(likes - 1, 0)",
            };
            sqlx::query(&format!(
                "UPDATE user_profile SET likes = {profile_delta}, updated_at = now() WHERE user_id = $1",
            ))
            .bind(creator_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(LikeOutcome {
            liked: change == LikeChange::Added,
            like_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_like_change_tracks_changed_rows() {
        assert_eq!(like_change(1, 0), LikeChange::Added);
        assert_eq!(like_change(0, 1), LikeChange::Removed);
        // Insert conflicted and a concurrent unlike won the delete: no row
        // changed here, so no counter movement is attributable to this call.
        assert_eq!(like_change(0, 0), LikeChange::None);
    }
}

