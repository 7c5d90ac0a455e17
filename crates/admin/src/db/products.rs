//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use jagmart_core::{Price, Product, ProductId, StockQuantity, SubcategoryId};

use super::{RepositoryError, map_constraint, non_blank};
use crate::models::{ProductInput, ProductListing, ProductPatch};

const DUPLICATE_NAME: &str = "This subcategory already has a product with this name";

const RETURNING_PRODUCT: &str = "RETURNING id, subcategory_id, name, description, price, \
     stock_quantity, image_url, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
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

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let price = Price::new(row.price)
            .map_err(|e| RepositoryError::DataCorruption(format!("product {id}: {e}")))?;
        let stock_quantity = StockQuantity::new(i64::from(row.stock_quantity))
            .map_err(|e| RepositoryError::DataCorruption(format!("product {id}: {e}")))?;

        Ok(Self {
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
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductListingRow {
    #[sqlx(flatten)]
    product: ProductRow,
    subcategory_name: String,
    category_name: String,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products with subcategory and category names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored price or stock is invalid.
    pub async fn list(&self) -> Result<Vec<ProductListing>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductListingRow>(
            r"
            SELECT p.id, p.subcategory_id, p.name, p.description, p.price, p.stock_quantity,
                   p.image_url, p.is_active, p.created_at, p.updated_at,
                   s.name AS subcategory_name, c.name AS category_name
            FROM products p
            JOIN subcategories s ON s.id = p.subcategory_id
            JOIN categories c ON c.id = s.category_id
            ORDER BY p.created_at DESC, p.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(ProductListing {
                    product: r.product.try_into()?,
                    subcategory_name: r.subcategory_name,
                    category_name: r.category_name,
                })
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the subcategory does not exist.
    /// Returns `RepositoryError::Conflict` if the subcategory already has a
    /// product with this name.
    pub async fn create(
        &self,
        name: &str,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO products
                (subcategory_id, name, description, price, stock_quantity, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            {RETURNING_PRODUCT}
            "
        ))
        .bind(input.subcategory_id)
        .bind(name)
        .bind(non_blank(input.description.as_deref()))
        .bind(input.price.amount())
        .bind(input.stock_quantity.get())
        .bind(non_blank(input.image_url.as_deref()))
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, DUPLICATE_NAME, "Subcategory"))?;

        row.try_into()
    }

    /// Apply a partial update. `name` must already be validated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: ProductId,
        name: Option<&str>,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE products SET
                name           = COALESCE($2, name),
                description    = CASE WHEN $3 THEN $4 ELSE description END,
                image_url      = CASE WHEN $5 THEN $6 ELSE image_url END,
                is_active      = COALESCE($7, is_active),
                price          = COALESCE($8, price),
                stock_quantity = COALESCE($9, stock_quantity),
                updated_at     = now()
            WHERE id = $1
            {RETURNING_PRODUCT}
            "
        ))
        .bind(id)
        .bind(name)
        .bind(patch.description.is_some())
        .bind(non_blank(patch.description.as_deref()))
        .bind(patch.image_url.is_some())
        .bind(non_blank(patch.image_url.as_deref()))
        .bind(patch.is_active)
        .bind(patch.price.map(|p| p.amount()))
        .bind(patch.stock_quantity.map(StockQuantity::get))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint(e, DUPLICATE_NAME, "Subcategory"))?;

        row.map(Product::try_from)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_rejects_negative_stock() {
        let row = ProductRow {
            id: 4,
            subcategory_id: 2,
            name: "Toor Dal".into(),
            description: None,
            price: Decimal::new(14500, 2),
            stock_quantity: -2,
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(
            Product::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
