//! Type-safe price representation using decimal arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount could not be parsed as a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is zero or negative.
    #[error("price must be positive")]
    NotPositive,
    /// The amount exceeds what the payment gateway accepts.
    #[error("price too large")]
    TooLarge,
}

/// A price with currency information.
///
/// Amounts are stored in the currency's standard unit (dollars, not cents)
/// with decimal arithmetic to avoid floating-point drift in totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Gateway limit on payment amounts (in the standard unit).
    const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999_99, 0, 0, false, 2);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero or negative amounts and
    /// [`PriceError::TooLarge`] for amounts above the gateway limit.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge);
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Parse a price from a decimal string like `"19.99"` (USD).
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the string is not a decimal number,
    /// plus the range errors from [`Price::new`].
    pub fn parse_usd(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s
            .trim()
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount, CurrencyCode::USD)
    }

    /// Build a price from an amount already stored in the database.
    ///
    /// Database values were validated on the way in, so this does not
    /// re-check the range.
    #[must_use]
    pub const fn from_stored(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// The amount in the currency's minor unit (cents for USD), rounded
    /// half-up, as payment gateways expect.
    #[must_use]
    pub fn to_minor_units(&self) -> i64 {
        (self.amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Format for display (e.g., `$19.99`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code as used by the payment gateway (lowercase).
    #[must_use]
    pub const fn gateway_code(self) -> &'static str {
        match self {
            Self::USD => "usd",
            Self::EUR => "eur",
            Self::GBP => "gbp",
            Self::CAD => "cad",
            Self::AUD => "aud",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let price = Price::parse_usd("19.99").unwrap();
        assert_eq!(price.display(), "$19.99");
    }

    #[test]
    fn test_display_pads_cents() {
        let price = Price::parse_usd("5").unwrap();
        assert_eq!(price.display(), "$5.00");

        let price = Price::parse_usd("5.5").unwrap();
        assert_eq!(price.display(), "$5.50");
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Price::parse_usd("19.99").unwrap().to_minor_units(), 1999);
        assert_eq!(Price::parse_usd("0.01").unwrap().to_minor_units(), 1);
    }

    #[test]
    fn test_minor_units_round_half_up() {
        // Midpoints round away from zero, not to the nearest even cent
        assert_eq!(Price::parse_usd("1.005").unwrap().to_minor_units(), 101);
        assert_eq!(Price::parse_usd("1.025").unwrap().to_minor_units(), 103);
        assert_eq!(Price::parse_usd("1.004").unwrap().to_minor_units(), 100);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!(matches!(
            Price::parse_usd("0"),
            Err(PriceError::NotPositive)
        ));
        assert!(matches!(
            Price::parse_usd("-3.50"),
            Err(PriceError::NotPositive)
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Price::parse_usd("nineteen"),
            Err(PriceError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_too_large() {
        assert!(matches!(
            Price::parse_usd("10000000"),
            Err(PriceError::TooLarge)
        ));
    }

    #[test]
    fn test_gateway_code() {
        assert_eq!(CurrencyCode::USD.gateway_code(), "usd");
    }
}
