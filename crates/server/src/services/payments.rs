//! Payment gateway client (Stripe).
//!
//! Talks to the Payment Intents API directly over HTTPS with form-encoded
//! bodies. The secret key never leaves the server; clients receive only the
//! intent's client secret and the publishable key.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use shopreel_core::Price;

use crate::config::StripeConfig;

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

/// Payment gateway errors.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP transport failure talking to the gateway.
    #[error("payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway rejected the request.
    #[error("payment gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },
}

/// A created payment intent, ready to hand to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Gateway-assigned intent ID.
    pub id: String,
    /// Client secret used by the frontend to confirm the payment.
    pub client_secret: String,
}

#[derive(Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Deserialize)]
struct GatewayErrorDetail {
    message: String,
}

/// Client for the payment gateway.
pub struct StripeClient {
    http: Client,
    secret_key: SecretString,
    publishable_key: String,
}

impl StripeClient {
    /// Create a gateway client from configuration.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            http: Client::new(),
            secret_key: config.secret_key.clone(),
            publishable_key: config.publishable_key.clone(),
        }
    }

    /// The publishable key, safe to return to clients.
    #[must_use]
    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    /// Create a payment intent for the given total.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Gateway` for non-2xx gateway responses and
    /// `PaymentError::Request` for transport failures.
    pub async fn create_payment_intent(&self, total: &Price) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .http
            .post(PAYMENT_INTENTS_URL)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&intent_params(total))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GatewayErrorBody>()
                .await
                .map_or_else(|_| "unknown gateway error".to_owned(), |b| b.error.message);
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<PaymentIntent>().await?)
    }
}

/// Form parameters for a payment-intent creation request.
///
/// Amounts are sent in the currency's minor units, per the gateway API.
fn intent_params(total: &Price) -> Vec<(&'static str, String)> {
    vec![
        ("amount", total.to_minor_units().to_string()),
        ("currency", total.currency_code.gateway_code().to_string()),
        ("automatic_payment_methods[enabled]", "true".to_string()),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_params_minor_units() {
        let params = intent_params(&Price::parse_usd("19.99").unwrap());
        assert!(params.contains(&("amount", "1999".to_string())));
        assert!(params.contains(&("currency", "usd".to_string())));
        assert!(params.contains(&("automatic_payment_methods[enabled]", "true".to_string())));
    }

    #[test]
    fn test_intent_params_whole_dollars() {
        let params = intent_params(&Price::parse_usd("45.00").unwrap());
        assert!(params.contains(&("amount", "4500".to_string())));
    }
}
