//! Checkout routes.
//!
//! The server's part of checkout is intentionally small: create a payment
//! intent for the cart subtotal and hand the client secret back. The client
//! confirms the payment in the gateway's hosted element, then calls
//! `/checkout/complete` to clear the cart and get the success redirect.

use axum::routing::post;
use axum::{Json, Router, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use shopreel_core::Price;

use crate::error::{AppError, Result};
use crate::models::cart::Cart;
use crate::routes::cart::{load_cart, save_cart};
use crate::state::AppState;

/// Frontend route the client navigates to after a confirmed payment.
const ORDER_SUCCESS_PATH: &str = "/order-success";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/intent", post(intent))
        .route("/checkout/complete", post(complete))
}

#[derive(Debug, Serialize)]
struct IntentResponse {
    client_secret: String,
    publishable_key: String,
    /// Charge amount in the currency's minor units.
    amount: i64,
}

/// The amount to charge for a cart. An empty cart has nothing to charge, so
/// it is rejected before anything reaches the gateway.
fn payable_total(cart: &Cart) -> Result<Price> {
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }
    Ok(cart.subtotal())
}

/// Create a payment intent for the cart subtotal.
async fn intent(State(state): State<AppState>, session: Session) -> Result<Json<IntentResponse>> {
    let cart = load_cart(&session).await?;
    let total = payable_total(&cart)?;
    let payment_intent = state.payments().create_payment_intent(&total).await?;
    tracing::info!(intent_id = %payment_intent.id, amount = total.to_minor_units(), "payment intent created");

    Ok(Json(IntentResponse {
        client_secret: payment_intent.client_secret,
        publishable_key: state.payments().publishable_key().to_owned(),
        amount: total.to_minor_units(),
    }))
}

/// Clear the cart after the client confirms payment.
async fn complete(session: Session) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(json!({ "redirect": ORDER_SUCCESS_PATH })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use shopreel_core::ProductId;

    use crate::models::product::ProductSnapshot;

    #[test]
    fn test_payable_total_rejects_empty_cart() {
        let err = payable_total(&Cart::default()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "cart is empty"));
    }

    #[test]
    fn test_payable_total_is_cart_subtotal() {
        let mut cart = Cart::default();
        cart.add(ProductSnapshot {
            id: ProductId::generate(),
            name: "shirt".to_string(),
            unit_price: Price::parse_usd("19.99").unwrap(),
            media_url: "https://example.com/shirt.jpg".to_string(),
            creator_name: "Ava".to_string(),
        });

        let total = payable_total(&cart).unwrap();
        assert_eq!(total.to_minor_units(), 1999);
    }
}
