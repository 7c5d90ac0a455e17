//! Subcategory repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use jagmart_core::{CategoryId, Subcategory, SubcategoryId};

use super::{RepositoryError, map_constraint, non_blank};
use crate::models::{SubcategoryInput, SubcategoryListing, SubcategoryPatch};

const DUPLICATE_NAME: &str = "This category already has a subcategory with this name";

#[derive(Debug, sqlx::FromRow)]
struct SubcategoryRow {
    id: i32,
    category_id: i32,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubcategoryRow> for Subcategory {
    fn from(row: SubcategoryRow) -> Self {
        Self {
            id: SubcategoryId::new(row.id),
            category_id: CategoryId::new(row.category_id),
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubcategoryListingRow {
    #[sqlx(flatten)]
    subcategory: SubcategoryRow,
    category_name: String,
}

/// Repository for subcategory database operations.
pub struct SubcategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubcategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All subcategories with their category name, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SubcategoryListing>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubcategoryListingRow>(
            r"
            SELECT s.id, s.category_id, s.name, s.description, s.image_url, s.is_active,
                   s.created_at, s.updated_at, c.name AS category_name
            FROM subcategories s
            JOIN categories c ON c.id = s.category_id
            ORDER BY s.created_at DESC, s.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SubcategoryListing {
                subcategory: r.subcategory.into(),
                category_name: r.category_name,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if the category already has a
    /// subcategory with this name.
    pub async fn create(
        &self,
        name: &str,
        input: &SubcategoryInput,
    ) -> Result<Subcategory, RepositoryError> {
        let row = sqlx::query_as::<_, SubcategoryRow>(
            r"
            INSERT INTO subcategories (category_id, name, description, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, category_id, name, description, image_url, is_active,
                      created_at, updated_at
            ",
        )
        .bind(input.category_id)
        .bind(name)
        .bind(non_blank(input.description.as_deref()))
        .bind(non_blank(input.image_url.as_deref()))
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, DUPLICATE_NAME, "Category"))?;

        Ok(row.into())
    }

    /// Apply a partial update. `name` must already be validated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subcategory does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: SubcategoryId,
        name: Option<&str>,
        patch: &SubcategoryPatch,
    ) -> Result<Subcategory, RepositoryError> {
        let row = sqlx::query_as::<_, SubcategoryRow>(
            r"
            UPDATE subcategories SET
                name        = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                image_url   = CASE WHEN $5 THEN $6 ELSE image_url END,
                is_active   = COALESCE($7, is_active),
                updated_at  = now()
            WHERE id = $1
            RETURNING id, category_id, name, description, image_url, is_active,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(name)
        .bind(patch.description.is_some())
        .bind(non_blank(patch.description.as_deref()))
        .bind(patch.image_url.is_some())
        .bind(non_blank(patch.image_url.as_deref()))
        .bind(patch.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint(e, DUPLICATE_NAME, "Category"))?;

        row.map(Subcategory::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a subcategory and its products in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subcategory does not exist.
    pub async fn delete(&self, id: SubcategoryId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let products = sqlx::query("DELETE FROM products WHERE subcategory_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM subcategories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        tracing::info!(subcategory_id = %id, products, "Subcategory deleted");
        Ok(())
    }
}
