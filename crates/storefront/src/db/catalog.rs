//! Read-only catalog queries for shoppers.
//!
//! Every query here filters on `is_active`; inactive categories,
//! subcategories, and products are invisible to the storefront.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use jagmart_core::{
    CategoryCard, CategoryId, NavigationCategory, ParentCategory, Price, Product, ProductId,
    StockQuantity, SubcategoryId,
};

use super::RepositoryError;

/// Column list for `products` aliased as `p`.
pub(crate) const PRODUCT_COLUMNS: &str = "p.id, p.subcategory_id, p.name, p.description, \
     p.price, p.stock_quantity, p.image_url, p.is_active, p.created_at, p.updated_at";

/// Products joined to their subcategory (`s`) and category (`c`).
const VISIBLE_PRODUCTS: &str = "products p \
     JOIN subcategories s ON s.id = p.subcategory_id \
     JOIN categories c ON c.id = s.category_id";

/// A product is on sale only while it and both of its parents are active.
const IS_VISIBLE: &str = "p.is_active AND s.is_active AND c.is_active";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
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
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let stock_quantity = StockQuantity::new(i64::from(row.stock_quantity)).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;

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

pub(crate) fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: i32,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    item_count: i64,
}

/// Header information for a category page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryHeader {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryHeaderRow {
    id: i32,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
}

/// Header information for a subcategory page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubcategoryHeader {
    pub id: SubcategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: ParentCategory,
}

#[derive(Debug, sqlx::FromRow)]
struct SubcategoryHeaderRow {
    id: i32,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    category_id: i32,
    category_name: String,
}

/// Filters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub name_contains: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active categories with their active subcategories, both sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn navigation(&self) -> Result<Vec<NavigationCategory>, RepositoryError> {
        let categories: Vec<(i32, String)> = sqlx::query_as(
            "SELECT id, name FROM categories WHERE is_active ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;

        let subcategories: Vec<(i32, i32, String)> = sqlx::query_as(
            "SELECT id, category_id, name FROM subcategories WHERE is_active ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(NavigationCategory::assemble(
            categories
                .into_iter()
                .map(|(id, name)| (CategoryId::new(id), name))
                .collect(),
            subcategories
                .into_iter()
                .map(|(id, category_id, name)| {
                    (SubcategoryId::new(id), CategoryId::new(category_id), name)
                })
                .collect(),
        ))
    }

    /// Home page cards, newest category first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_cards(&self) -> Result<Vec<CategoryCard>, RepositoryError> {
        let rows = sqlx::query_as::<_, CardRow>(
            r"
            SELECT c.id, c.name, c.description, c.image_url,
                   (SELECT COUNT(*)
                      FROM products p
                      JOIN subcategories s ON s.id = p.subcategory_id
                     WHERE s.category_id = c.id AND s.is_active AND p.is_active
                   ) AS item_count
            FROM categories c
            WHERE c.is_active
            ORDER BY c.created_at DESC, c.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                CategoryCard::new(
                    CategoryId::new(r.id),
                    r.name,
                    r.description,
                    r.image_url,
                    r.item_count,
                )
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<CategoryHeader>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryHeaderRow>(
            "SELECT id, name, description, image_url FROM categories WHERE id = $1 AND is_active",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| CategoryHeader {
            id: CategoryId::new(r.id),
            name: r.name,
            description: r.description,
            image_url: r.image_url,
        }))
    }

    /// Active subcategory joined with its parent category.
    ///
    /// A subcategory under an inactive category is treated as missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_subcategory(
        &self,
        id: SubcategoryId,
    ) -> Result<Option<SubcategoryHeader>, RepositoryError> {
        let row = sqlx::query_as::<_, SubcategoryHeaderRow>(
            r"
            SELECT s.id, s.name, s.description, s.image_url,
                   c.id AS category_id, c.name AS category_name
            FROM subcategories s
            JOIN categories c ON c.id = s.category_id
            WHERE s.id = $1 AND s.is_active AND c.is_active
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| SubcategoryHeader {
            id: SubcategoryId::new(r.id),
            name: r.name,
            description: r.description,
            image_url: r.image_url,
            category: ParentCategory {
                id: CategoryId::new(r.category_id),
                name: r.category_name,
            },
        }))
    }

    /// Active products in a category's active subcategories, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored price or stock is invalid.
    pub async fn products_in_category(
        &self,
        id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM {VISIBLE_PRODUCTS}
            WHERE s.category_id = $1 AND {IS_VISIBLE}
            ORDER BY p.created_at DESC, p.id DESC
            "
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        into_products(rows)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored price or stock is invalid.
    pub async fn products_in_subcategory(
        &self,
        id: SubcategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM {VISIBLE_PRODUCTS}
            WHERE p.subcategory_id = $1 AND {IS_VISIBLE}
            ORDER BY p.created_at DESC, p.id DESC
            "
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        into_products(rows)
    }

    /// Product listing with optional name search and category filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored price or stock is invalid.
    pub async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let pattern = filter
            .name_contains
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)));

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM {VISIBLE_PRODUCTS}
            WHERE {IS_VISIBLE}
              AND ($1::text IS NULL OR p.name ILIKE $1 ESCAPE '\')
              AND ($2::int IS NULL OR s.category_id = $2)
            ORDER BY p.created_at DESC, p.id DESC
            "
        ))
        .bind(pattern)
        .bind(filter.category_id)
        .fetch_all(self.pool)
        .await?;

        into_products(rows)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored price or stock is invalid.
    pub async fn active_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM {VISIBLE_PRODUCTS} WHERE p.id = $1 AND {IS_VISIBLE}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_covers_every_level() {
        for alias in ["p", "s", "c"] {
            assert!(IS_VISIBLE.contains(&format!("{alias}.is_active")));
        }
        assert!(VISIBLE_PRODUCTS.contains("JOIN subcategories s ON s.id = p.subcategory_id"));
        assert!(VISIBLE_PRODUCTS.contains("JOIN categories c ON c.id = s.category_id"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("milk"), "milk");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[test]
    fn test_product_row_rejects_negative_price() {
        let row = ProductRow {
            id: 9,
            subcategory_id: 1,
            name: "Ghee".into(),
            description: None,
            price: Decimal::new(-100, 2),
            stock_quantity: 3,
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
