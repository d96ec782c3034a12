//! Product search.
//!
//! Matching is a case-insensitive substring test over the product name and
//! description. The database narrows candidates with `ILIKE` on both
//! columns; [`refilter`] re-applies the same predicate in process so the
//! semantics stay identical if the SQL pattern and the in-memory test ever
//! need to diverge (and so they are unit-testable without a database).

use crate::models::product::Product;

/// Normalize a raw query string.
///
/// Returns `None` for empty or whitespace-only input, which callers treat
/// as "no search performed" rather than "match everything".
#[must_use]
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Whether a product matches a normalized query.
#[must_use]
pub fn matches(product: &Product, query: &str) -> bool {
    product.name.to_lowercase().contains(query)
        || product.description.to_lowercase().contains(query)
}

/// Keep only the products matching a normalized query.
#[must_use]
pub fn refilter(products: Vec<Product>, query: &str) -> Vec<Product> {
    products.into_iter().filter(|p| matches(p, query)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::product::CreatorSnapshot;
    use chrono::Utc;
    use shopreel_core::{MediaKind, Price, ProductId, UserId};

    fn product(name: &str, description: &str) -> Product {
        Product {
            id: ProductId::generate(),
            creator: CreatorSnapshot {
                id: UserId::generate(),
                name: "Ava".to_string(),
                avatar_url: "https://example.com/a.png".to_string(),
            },
            media_url: "https://example.com/p.jpg".to_string(),
            media_kind: MediaKind::Image,
            name: name.to_string(),
            description: description.to_string(),
            price: Price::parse_usd("10.00").unwrap(),
            sale_price: None,
            like_count: 0,
            comment_count: 0,
            liked_by_viewer: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Vintage Jacket "), Some("vintage jacket".to_string()));
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   "), None);
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        let p = product("Vintage Denim Jacket", "A jacket.");
        assert!(matches(&p, "denim"));
        assert!(matches(&p, "vintage denim"));
        assert!(!matches(&p, "sneaker"));
    }

    #[test]
    fn test_matches_description_only() {
        let p = product("Untitled drop #4", "Hand-stitched leather wallet");
        assert!(matches(&p, "leather"));
    }

    #[test]
    fn test_refilter() {
        let results = refilter(
            vec![
                product("Denim Jacket", "classic"),
                product("Sneakers", "fresh"),
                product("Tote", "denim-look canvas"),
            ],
            "denim",
        );
        assert_eq!(results.len(), 2);
    }
}
