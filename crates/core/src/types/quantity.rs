//! Cart and stock quantities.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity must be at least 1")]
    BelowOne,
    #[error("stock quantity cannot be negative")]
    NegativeStock,
    #[error("quantity is too large")]
    TooLarge,
}

/// Number of units of a product in a cart line. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    pub const ONE: Self = Self(1);

    /// # Errors
    ///
    /// Returns [`QuantityError::BelowOne`] for zero or negative values.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::BelowOne);
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge)
    }

    /// Clamp a requested quantity into the valid range.
    ///
    /// Shoppers stepping a quantity below one stay at one; removing a line is
    /// a separate action.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let value = value.clamp(1, i64::from(i32::MAX));
        Self(i32::try_from(value).unwrap_or(i32::MAX))
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// The quantity as an unsigned count.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

/// Units of a product on hand. Zero means out of stock.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i32")]
pub struct StockQuantity(i32);

impl StockQuantity {
    /// # Errors
    ///
    /// Returns [`QuantityError::NegativeStock`] below zero.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 0 {
            return Err(QuantityError::NegativeStock);
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_out_of_stock(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for StockQuantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StockQuantity> for i32 {
    fn from(q: StockQuantity) -> Self {
        q.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_requires_one() {
        assert_eq!(Quantity::new(0), Err(QuantityError::BelowOne));
        assert_eq!(Quantity::new(-4), Err(QuantityError::BelowOne));
        assert_eq!(Quantity::new(2).unwrap().get(), 2);
    }

    #[test]
    fn test_quantity_clamped() {
        assert_eq!(Quantity::clamped(0), Quantity::ONE);
        assert_eq!(Quantity::clamped(-10), Quantity::ONE);
        assert_eq!(Quantity::clamped(5).get(), 5);
        assert_eq!(Quantity::clamped(i64::MAX).get(), i32::MAX);
    }

    #[test]
    fn test_quantity_too_large() {
        assert_eq!(
            Quantity::new(i64::from(i32::MAX) + 1),
            Err(QuantityError::TooLarge)
        );
    }

    #[test]
    fn test_stock_quantity() {
        assert!(StockQuantity::new(0).unwrap().is_out_of_stock());
        assert_eq!(StockQuantity::new(-1), Err(QuantityError::NegativeStock));
    }

    #[test]
    fn test_quantity_deserialize_validates() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        let q: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "3");
    }
}
