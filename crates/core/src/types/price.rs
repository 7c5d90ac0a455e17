//! Rupee prices backed by decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative")]
    Negative,
    #[error("price must be greater than zero")]
    NotPositive,
    #[error("price must be a number")]
    NotANumber,
    #[error("price cannot exceed 99999999.99")]
    TooLarge,
}

/// A non-negative price in Indian rupees, kept at two decimal places.
///
/// Serializes as a decimal string (`"49.50"`) and renders for display with
/// the rupee sign:
///
/// ```
/// use jagmart_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(4950, 2)).unwrap();
/// assert_eq!(price.to_string(), "₹49.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount the `numeric(10,2)` price columns can hold.
    pub const MAX: Self = Self(Decimal::from_parts(1_410_065_407, 2, 0, false, 2));

    /// Create a price, rounding to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero and
    /// [`PriceError::TooLarge`] for amounts above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let rounded = amount.round_dp(2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            return Err(PriceError::Negative);
        }
        if rounded > Self::MAX.0 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(rounded))
    }

    /// Create a price that must be strictly greater than zero.
    ///
    /// Spreadsheet imports use this stricter rule; the admin forms accept a
    /// zero price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for amounts that are zero or
    /// negative once rounded to paise, and [`PriceError::TooLarge`] as for
    /// [`Price::new`].
    pub fn new_positive(amount: Decimal) -> Result<Self, PriceError> {
        if amount.round_dp(2) <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Self::new(amount)
    }

    /// Convert a spreadsheet float into a positive price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] for NaN or infinite values, and
    /// [`PriceError::NotPositive`] or [`PriceError::TooLarge`] as for
    /// [`Price::new_positive`].
    pub fn from_f64_positive(value: f64) -> Result<Self, PriceError> {
        let amount = Decimal::from_f64_retain(value).ok_or(PriceError::NotANumber)?;
        Self::new_positive(amount)
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

/// Render any decimal amount the way prices are shown to shoppers.
#[must_use]
pub fn format_rupees(amount: Decimal) -> String {
    format!("₹{:.2}", amount.round_dp(2))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_rupees(self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        assert_eq!(Price::new(Decimal::new(-1, 2)), Err(PriceError::Negative));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_new_positive_rejects_zero() {
        assert_eq!(
            Price::new_positive(Decimal::ZERO),
            Err(PriceError::NotPositive)
        );
        assert!(Price::new_positive(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn test_from_f64_positive() {
        let price = Price::from_f64_positive(12.5).unwrap();
        assert_eq!(price.to_string(), "₹12.50");
        assert_eq!(
            Price::from_f64_positive(f64::NAN),
            Err(PriceError::NotANumber)
        );
        assert_eq!(
            Price::from_f64_positive(-3.0),
            Err(PriceError::NotPositive)
        );
    }

    #[test]
    fn test_positive_checks_rounded_amount() {
        assert_eq!(
            Price::new_positive(Decimal::new(4, 3)),
            Err(PriceError::NotPositive)
        );
        assert_eq!(
            Price::from_f64_positive(0.004),
            Err(PriceError::NotPositive)
        );
        let price = Price::new_positive(Decimal::new(5, 3)).unwrap();
        assert_eq!(price.amount(), Decimal::new(1, 2));
    }

    #[test]
    fn test_rejects_amounts_beyond_column() {
        assert_eq!(Price::MAX.amount(), Decimal::new(9_999_999_999, 2));
        assert!(Price::new(Decimal::new(9_999_999_999, 2)).is_ok());
        assert_eq!(
            Price::new(Decimal::new(10_000_000_000, 2)),
            Err(PriceError::TooLarge)
        );
        assert_eq!(Price::from_f64_positive(1e12), Err(PriceError::TooLarge));
        assert!(serde_json::from_str::<Price>("\"123456789\"").is_err());
    }

    #[test]
    fn test_rounds_to_paise() {
        let price = Price::new(Decimal::new(19_999, 3)).unwrap();
        assert_eq!(price.amount(), Decimal::new(2000, 2));
    }

    #[test]
    fn test_times_quantity() {
        let price = Price::new(Decimal::new(4950, 2)).unwrap();
        assert_eq!(price.times(3), Decimal::new(14_850, 2));
    }

    #[test]
    fn test_serde_accepts_strings_and_numbers() {
        let from_str: Price = serde_json::from_str("\"10.25\"").unwrap();
        let from_num: Price = serde_json::from_str("10.25").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"10.25\"");
        assert!(serde_json::from_str::<Price>("\"-1\"").is_err());
    }
}
