//! Cart service.
//!
//! Every mutation returns the refreshed cart so clients never have to
//! reconcile local state with the server.

use sqlx::PgPool;
use thiserror::Error;

use jagmart_core::{Cart, ProductId, Quantity, UserId};

use crate::db::{CartRepository, CatalogRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum CartError {
    /// The product does not exist or has been deactivated.
    #[error("product {0} is not available")]
    ProductUnavailable(ProductId),

    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart operations for one logged-in user.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    catalog: CatalogRepository<'a>,
    user_id: UserId,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, user_id: UserId) -> Self {
        Self {
            carts: CartRepository::new(pool),
            catalog: CatalogRepository::new(pool),
            user_id,
        }
    }

    /// Current cart contents, creating an empty cart on first access.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn view(&self) -> Result<Cart, CartError> {
        let cart_id = self.carts.get_or_create(self.user_id).await?;
        let lines = self.carts.lines(cart_id).await?;
        Ok(Cart {
            id: cart_id,
            user_id: self.user_id,
            lines,
        })
    }

    /// Add `quantity` units (default one) of a product.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductUnavailable` for unknown or inactive products.
    pub async fn add(
        &self,
        product_id: ProductId,
        quantity: Option<i64>,
    ) -> Result<Cart, CartError> {
        if self.catalog.active_product(product_id).await?.is_none() {
            return Err(CartError::ProductUnavailable(product_id));
        }

        let quantity = quantity.map_or(Quantity::ONE, Quantity::clamped);
        let cart_id = self.carts.get_or_create(self.user_id).await?;
        self.carts.add_item(cart_id, product_id, quantity).await?;

        tracing::debug!(user_id = %self.user_id, %product_id, quantity = quantity.get(), "Added to cart");
        self.view().await
    }

    /// Replace a line's quantity. Values below one are raised to one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if the product has no line in the cart.
    pub async fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        let cart_id = self.carts.get_or_create(self.user_id).await?;
        self.carts
            .set_quantity(cart_id, product_id, Quantity::clamped(quantity))
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::NotInCart(product_id),
                other => CartError::Repository(other),
            })?;
        self.view().await
    }

    /// Remove a product. Removing a product that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn remove(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let cart_id = self.carts.get_or_create(self.user_id).await?;
        self.carts.remove_item(cart_id, product_id).await?;
        self.view().await
    }

    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn clear(&self) -> Result<Cart, CartError> {
        let cart_id = self.carts.get_or_create(self.user_id).await?;
        let removed = self.carts.clear(cart_id).await?;
        tracing::debug!(user_id = %self.user_id, removed, "Cart cleared");
        self.view().await
    }
}
