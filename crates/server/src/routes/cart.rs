//! Cart routes, backed by the session record.
//!
//! Every mutation returns the full cart view so the client can replace its
//! local state wholesale instead of patching it.

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_sessions::Session;

use shopreel_core::ProductId;

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::cart::{Cart, normalize_quantity};
use crate::models::product::ProductSnapshot;
use crate::models::user::session_keys;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(show))
        .route("/cart/items", post(add_item))
        .route(
            "/cart/items/{product_id}",
            patch(set_quantity).delete(remove_item),
        )
}

/// Cart response shape.
#[derive(Debug, Serialize)]
struct CartView {
    lines: Vec<CartLineView>,
    item_count: u32,
    subtotal: String,
}

#[derive(Debug, Serialize)]
struct CartLineView {
    product: ProductSnapshot,
    quantity: u32,
    total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    product: line.product.clone(),
                    quantity: line.quantity,
                    total: line.total().display(),
                })
                .collect(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal().display(),
        }
    }
}

/// Load the cart from the session, defaulting to empty.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get(session_keys::CART).await?.unwrap_or_default())
}

/// Persist the cart back into the session.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// The session cart.
async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

#[derive(Debug, Deserialize)]
struct AddItemRequest {
    product_id: ProductId,
}

/// Add a product to the cart (quantity 1, merged into an existing line).
async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let product = ProductRepository::new(state.pool())
        .get(request.product_id, None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let mut cart = load_cart(&session).await?;
    cart.add(ProductSnapshot::from(&product));
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Set a line's quantity. Anything that isn't a positive integer becomes 1.
async fn set_quantity(
    session: Session,
    Path(product_id): Path<ProductId>,
    Json(body): Json<Value>,
) -> Result<Json<CartView>> {
    let quantity = normalize_quantity(body.get("quantity"));

    let mut cart = load_cart(&session).await?;
    if !cart.set_quantity(product_id, quantity) {
        return Err(AppError::NotFound(format!(
            "product {product_id} not in cart"
        )));
    }
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
async fn remove_item(session: Session, Path(product_id): Path<ProductId>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(product_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}
