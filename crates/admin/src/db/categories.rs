//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use jagmart_core::{Category, CategoryId};

use super::{RepositoryError, map_constraint, non_blank};
use crate::models::{CategoryInput, CategoryPatch};

const DUPLICATE_NAME: &str = "A category with this name already exists";

const CATEGORY_COLUMNS: &str =
    "id, name, description, image_url, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    pub async fn create(
        &self,
        name: &str,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r"
            INSERT INTO categories (name, description, image_url, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(name)
        .bind(non_blank(input.description.as_deref()))
        .bind(non_blank(input.image_url.as_deref()))
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, DUPLICATE_NAME, "category"))?;

        Ok(row.into())
    }

    /// Apply a partial update. `name` must already be validated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        patch: &CategoryPatch,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r"
            UPDATE categories SET
                name        = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                image_url   = CASE WHEN $5 THEN $6 ELSE image_url END,
                is_active   = COALESCE($7, is_active),
                updated_at  = now()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(name)
        .bind(patch.description.is_some())
        .bind(non_blank(patch.description.as_deref()))
        .bind(patch.image_url.is_some())
        .bind(non_blank(patch.image_url.as_deref()))
        .bind(patch.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint(e, DUPLICATE_NAME, "category"))?;

        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category with its subcategories and their products.
    ///
    /// Children are removed first, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let products = sqlx::query(
            r"
            DELETE FROM products
            WHERE subcategory_id IN (SELECT id FROM subcategories WHERE category_id = $1)
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let subcategories = sqlx::query("DELETE FROM subcategories WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        tracing::info!(category_id = %id, subcategories, products, "Category deleted");
        Ok(())
    }
}
