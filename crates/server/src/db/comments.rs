//! Comment repository.
//!
//! Comments are append-only. Replies reference a top-level comment; the
//! single nesting level is enforced here at insert time.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopreel_core::{CommentId, ProductId, UserId};

use super::RepositoryError;
use crate::models::comment::{AuthorSnapshot, Comment};

/// Row shape for `comment`.
#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    product_id: Uuid,
    author_id: Uuid,
    author_name: String,
    author_avatar_url: String,
    body: String,
    parent_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::from_uuid(row.id),
            product_id: ProductId::from_uuid(row.product_id),
            author: AuthorSnapshot {
                id: UserId::from_uuid(row.author_id),
                name: row.author_name,
                avatar_url: row.author_avatar_url,
            },
            body: row.body,
            parent_id: row.parent_id.map(CommentId::from_uuid),
            created_at: row.created_at,
        }
    }
}

const COMMENT_COLUMNS: &str =
    "id, product_id, author_id, author_name, author_avatar_url, body, parent_id, created_at";

/// Repository for comment database operations.
pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a product's comments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            r"
            SELECT {COMMENT_COLUMNS}
            FROM comment
            WHERE product_id = $1
            ORDER BY created_at ASC
            ",
        ))
        .bind(product_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Post a comment, optionally as a reply to a top-level comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist, or
    /// if `parent_id` doesn't name a top-level comment on the same product.
    pub async fn create(
        &self,
        product_id: ProductId,
        author: &AuthorSnapshot,
        body: &str,
        parent_id: Option<CommentId>,
    ) -> Result<Comment, RepositoryError> {
        if let Some(parent) = parent_id {
            let valid = sqlx::query_as::<_, (bool,)>(
                r"
                SELECT (parent_id IS NULL) AS top_level
                FROM comment
                WHERE id = $1 AND product_id = $2
                ",
            )
            .bind(parent.as_uuid())
            .bind(product_id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

            match valid {
                Some((true,)) => {}
                _ => return Err(RepositoryError::NotFound),
            }
        }

        let row = sqlx::query_as::<_, CommentRow>(&format!(
            r"
            INSERT INTO comment (id, product_id, author_id, author_name,
                                 author_avatar_url, body, parent_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COMMENT_COLUMNS}
            ",
        ))
        .bind(Uuid::new_v4())
        .bind(product_id.as_uuid())
        .bind(author.id.as_uuid())
        .bind(&author.name)
        .bind(&author.avatar_url)
        .bind(body)
        .bind(parent_id.map(|p| p.as_uuid()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }
}
