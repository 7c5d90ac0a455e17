//! Cart repository.
//!
//! A user has at most one cart (`carts.user_id` is unique) and a product
//! appears at most once per cart (`cart_items (cart_id, product_id)` is unique).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use jagmart_core::{
    CartId, CartItemId, CartLine, Price, Product, ProductId, Quantity, StockQuantity,
    SubcategoryId, UserId,
};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    item_id: i32,
    quantity: i32,
    id: i32,
    subcategory_id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock_quantity: i32,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let item_id = row.item_id;
        let corrupt = |e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!("cart item {item_id}: {e}"))
        };

        let quantity = Quantity::new(i64::from(row.quantity)).map_err(|e| corrupt(&e))?;
        let price = Price::new(row.price).map_err(|e| corrupt(&e))?;
        let stock_quantity =
            StockQuantity::new(i64::from(row.stock_quantity)).map_err(|e| corrupt(&e))?;

        Ok(Self {
            id: CartItemId::new(row.item_id),
            quantity,
            product: Product {
                id: ProductId::new(row.id),
                subcategory_id: SubcategoryId::new(row.subcategory_id),
                name: row.name,
                description: row.description,
                price,
                stock_quantity,
                image_url: row.image_url,
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Return the user's cart, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<CartId, RepositoryError> {
        let id: CartId = sqlx::query_scalar(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Lines of a cart joined with their products, oldest line first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id AS item_id, ci.quantity,
                   p.id, p.subcategory_id, p.name, p.description, p.price,
                   p.stock_quantity, p.image_url, p.is_active, p.created_at, p.updated_at
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at, ci.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLine::try_from).collect()
    }

    /// Add a product, or increase its quantity if it is already in the cart.
    ///
    /// The summed quantity saturates at `i32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id) DO UPDATE
               SET quantity = LEAST(cart_items.quantity::bigint + EXCLUDED.quantity, 2147483647)::int,
                   updated_at = now()
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity.get())
        .execute(self.pool)
        .await?;

        self.touch(cart_id).await
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the cart.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
               SET quantity = $3, updated_at = now()
             WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity.get())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.touch(cart_id).await
    }

    /// Remove a product from the cart. Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        self.touch(cart_id).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every line. Returns the number of lines removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        self.touch(cart_id).await?;
        Ok(result.rows_affected())
    }

    async fn touch(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
