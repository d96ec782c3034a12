//! Product domain types and API views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopreel_core::{MediaKind, Price, ProductId, UserId};

/// Denormalized creator info stored on each product.
///
/// This is a snapshot taken at upload time; it can drift from the live
/// profile if the creator later edits their name or avatar. Accepted
/// trade-off for read-heavy feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorSnapshot {
    /// Creator's user ID.
    pub id: UserId,
    /// Display name at upload time.
    pub name: String,
    /// Avatar URL at upload time.
    pub avatar_url: String,
}

/// A product post (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Creator snapshot.
    pub creator: CreatorSnapshot,
    /// Public URL of the uploaded media.
    pub media_url: String,
    /// Image or video.
    pub media_kind: MediaKind,
    /// Product name.
    pub name: String,
    /// Product description.
    pub description: String,
    /// Regular price.
    pub price: Price,
    /// Discounted price, if on sale.
    pub sale_price: Option<Price>,
    /// Denormalized like count (kept equal to the liker-set size by the
    /// like-toggle transaction).
    pub like_count: i64,
    /// Number of comments, derived at query time.
    pub comment_count: i64,
    /// Whether the requesting user has liked this product.
    pub liked_by_viewer: bool,
    /// When the product was posted.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether the sale price undercuts the regular price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price
            .is_some_and(|sale| sale.amount < self.price.amount)
    }
}

/// JSON representation of a product for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub creator: CreatorSnapshot,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub name: String,
    pub description: String,
    /// Regular price, formatted for display (e.g., `$19.99`).
    pub price: String,
    /// Sale price, formatted, if on sale.
    pub sale_price: Option<String>,
    pub on_sale: bool,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_me: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            creator: product.creator.clone(),
            media_url: product.media_url.clone(),
            media_kind: product.media_kind,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            sale_price: product.sale_price.map(|p| p.display()),
            on_sale: product.is_on_sale(),
            like_count: product.like_count,
            comment_count: product.comment_count,
            liked_by_me: product.liked_by_viewer,
            created_at: product.created_at,
        }
    }
}

/// Minimal product snapshot stored in cart lines.
///
/// The cart lives in the session record, so it holds a copy of what the
/// buyer saw rather than a reference that could change under them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product ID (identity for cart line merging).
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price the buyer saw (sale price when on sale).
    pub unit_price: Price,
    /// Media URL for the cart display.
    pub media_url: String,
    /// Creator display name.
    pub creator_name: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.effective_price(),
            media_url: product.media_url.clone(),
            creator_name: product.creator.name.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product(price: &str, sale: Option<&str>) -> Product {
        Product {
            id: ProductId::generate(),
            creator: CreatorSnapshot {
                id: UserId::generate(),
                name: "Ava".to_string(),
                avatar_url: "https://example.com/a.png".to_string(),
            },
            media_url: "https://example.com/p.jpg".to_string(),
            media_kind: MediaKind::Image,
            name: "Test Shirt".to_string(),
            description: "A shirt".to_string(),
            price: Price::parse_usd(price).unwrap(),
            sale_price: sale.map(|s| Price::parse_usd(s).unwrap()),
            like_count: 0,
            comment_count: 0,
            liked_by_viewer: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_formats_price() {
        let view = ProductView::from(&sample_product("19.99", None));
        assert_eq!(view.price, "$19.99");
        assert_eq!(view.sale_price, None);
        assert!(!view.on_sale);
    }

    #[test]
    fn test_on_sale_requires_lower_price() {
        assert!(sample_product("19.99", Some("14.99")).is_on_sale());
        assert!(!sample_product("19.99", Some("19.99")).is_on_sale());
    }

    #[test]
    fn test_effective_price_prefers_sale() {
        let product = sample_product("19.99", Some("14.99"));
        assert_eq!(product.effective_price().display(), "$14.99");

        let snapshot = ProductSnapshot::from(&product);
        assert_eq!(snapshot.unit_price.display(), "$14.99");
    }
}
