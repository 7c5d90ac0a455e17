//! Shopping cart records and totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use crate::types::{CartId, CartItemId, ProductId, Quantity, UserId};

/// A cart line joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub quantity: Quantity,
    pub product: Product,
}

impl CartLine {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price.times(self.quantity.as_u32())
    }
}

/// A shopper's cart. Each user has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Sum of price times quantity over every line.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.as_u32()))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line_for(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{Price, StockQuantity, SubcategoryId};

    fn product(id: i32, price_paise: i64) -> Product {
        Product {
            id: ProductId::new(id),
            subcategory_id: SubcategoryId::new(1),
            name: format!("Product {id}"),
            description: None,
            price: Price::new(Decimal::new(price_paise, 2)).unwrap(),
            stock_quantity: StockQuantity::new(10).unwrap(),
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(id: i32, price_paise: i64, quantity: i64) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            quantity: Quantity::new(quantity).unwrap(),
            product: product(id, price_paise),
        }
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            lines: vec![],
        };
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_totals_sum_price_times_quantity() {
        let cart = Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            lines: vec![line(1, 4950, 2), line(2, 1000, 3)],
        };
        // 49.50 * 2 + 10.00 * 3
        assert_eq!(cart.total(), Decimal::new(12_900, 2));
        assert_eq!(cart.item_count(), 5);
        assert_eq!(
            crate::types::format_rupees(cart.total()),
            "₹129.00"
        );
    }

    #[test]
    fn test_line_for_product() {
        let cart = Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            lines: vec![line(7, 100, 1)],
        };
        assert!(cart.line_for(ProductId::new(7)).is_some());
        assert!(cart.line_for(ProductId::new(8)).is_none());
    }
}
