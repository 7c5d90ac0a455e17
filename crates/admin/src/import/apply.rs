//! Writing a validated import to the catalog.
//!
//! Categories go first, then subcategories, then products, so that each
//! level can find its parent by name. A missing parent is recorded in the
//! report and the row is skipped; any database or storage failure aborts.

use sqlx::{PgPool, Postgres, Transaction};

use jagmart_core::{CategoryId, ImageFolder, ProductId, SubcategoryId};

use super::image::DecodedImage;
use super::rows::{CommonFields, ProductRecord, ValidatedImport};
use super::{ImportError, ImportReport};
use crate::db::RepositoryError;
use crate::storage::ImageStore;

/// Where import rows are written.
///
/// Upserts leave an existing `description` or `image_url` alone when the
/// row does not supply one.
pub trait CatalogSink: Send {
    fn upsert_category(
        &mut self,
        fields: &CommonFields,
        image_url: Option<&str>,
    ) -> impl Future<Output = Result<CategoryId, RepositoryError>> + Send;

    fn find_category(
        &mut self,
        name: &str,
    ) -> impl Future<Output = Result<Option<CategoryId>, RepositoryError>> + Send;

    fn upsert_subcategory(
        &mut self,
        category_id: CategoryId,
        fields: &CommonFields,
        image_url: Option<&str>,
    ) -> impl Future<Output = Result<SubcategoryId, RepositoryError>> + Send;

    fn find_subcategory(
        &mut self,
        category_id: CategoryId,
        name: &str,
    ) -> impl Future<Output = Result<Option<SubcategoryId>, RepositoryError>> + Send;

    fn upsert_product(
        &mut self,
        subcategory_id: SubcategoryId,
        record: &ProductRecord,
        image_url: Option<&str>,
    ) -> impl Future<Output = Result<ProductId, RepositoryError>> + Send;
}

/// Apply every record of a valid import through `sink`.
///
/// # Errors
///
/// Returns `ImportError::Repository` or `ImportError::Storage` on the first
/// database or storage failure. Nothing is committed by this function.
pub async fn apply<S, I>(
    sink: &mut S,
    store: &I,
    import: &ValidatedImport,
) -> Result<ImportReport, ImportError>
where
    S: CatalogSink,
    I: ImageStore,
{
    let mut report = ImportReport::default();

    for record in &import.categories {
        let image_url = store_image(store, ImageFolder::Categories, record.fields.image.as_ref())
            .await?;
        sink.upsert_category(&record.fields, image_url.as_deref())
            .await?;
        report.categories += 1;
    }

    for record in &import.subcategories {
        let name = &record.fields.name;
        let Some(category_id) = sink.find_category(&record.category_name).await? else {
            report.errors.push(format!(
                "Category \"{}\" not found for subcategory \"{name}\"",
                record.category_name
            ));
            continue;
        };

        let image_url =
            store_image(store, ImageFolder::Subcategories, record.fields.image.as_ref()).await?;
        sink.upsert_subcategory(category_id, &record.fields, image_url.as_deref())
            .await?;
        report.subcategories += 1;
    }

    for record in &import.products {
        let subcategory_id = match sink.find_category(&record.category_name).await? {
            Some(category_id) => {
                sink.find_subcategory(category_id, &record.subcategory_name)
                    .await?
            }
            None => None,
        };
        let Some(subcategory_id) = subcategory_id else {
            report.errors.push(format!(
                "Subcategory \"{}\" not found in category \"{}\" for product \"{}\"",
                record.subcategory_name, record.category_name, record.fields.name
            ));
            continue;
        };

        let image_url =
            store_image(store, ImageFolder::Products, record.fields.image.as_ref()).await?;
        sink.upsert_product(subcategory_id, record, image_url.as_deref())
            .await?;
        report.products += 1;
    }

    report.applied = true;
    Ok(report)
}

async fn store_image<I: ImageStore>(
    store: &I,
    folder: ImageFolder,
    image: Option<&DecodedImage>,
) -> Result<Option<String>, ImportError> {
    match image {
        Some(image) => {
            let stored = store
                .store(folder, &image.content_type, &image.bytes)
                .await?;
            Ok(Some(stored.url))
        }
        None => Ok(None),
    }
}

/// A [`CatalogSink`] writing inside one `PostgreSQL` transaction.
///
/// Dropping the sink without calling [`PgCatalogSink::commit`] rolls back.
pub struct PgCatalogSink {
    tx: Transaction<'static, Postgres>,
}

impl PgCatalogSink {
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction cannot start.
    pub async fn begin(pool: &PgPool) -> Result<Self, RepositoryError> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the commit fails.
    pub async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl CatalogSink for PgCatalogSink {
    async fn upsert_category(
        &mut self,
        fields: &CommonFields,
        image_url: Option<&str>,
    ) -> Result<CategoryId, RepositoryError> {
        let id = sqlx::query_scalar(
            r"
            INSERT INTO categories (name, description, image_url, is_active)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE SET
                description = COALESCE(EXCLUDED.description, categories.description),
                image_url   = COALESCE(EXCLUDED.image_url, categories.image_url),
                is_active   = EXCLUDED.is_active,
                updated_at  = now()
            RETURNING id
            ",
        )
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(image_url)
        .bind(fields.is_active)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn find_category(&mut self, name: &str) -> Result<Option<CategoryId>, RepositoryError> {
        let id = sqlx::query_scalar("SELECT id FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(id)
    }

    async fn upsert_subcategory(
        &mut self,
        category_id: CategoryId,
        fields: &CommonFields,
        image_url: Option<&str>,
    ) -> Result<SubcategoryId, RepositoryError> {
        let id = sqlx::query_scalar(
            r"
            INSERT INTO subcategories (category_id, name, description, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name, category_id) DO UPDATE SET
                description = COALESCE(EXCLUDED.description, subcategories.description),
                image_url   = COALESCE(EXCLUDED.image_url, subcategories.image_url),
                is_active   = EXCLUDED.is_active,
                updated_at  = now()
            RETURNING id
            ",
        )
        .bind(category_id)
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(image_url)
        .bind(fields.is_active)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn find_subcategory(
        &mut self,
        category_id: CategoryId,
        name: &str,
    ) -> Result<Option<SubcategoryId>, RepositoryError> {
        let id = sqlx::query_scalar(
            "SELECT id FROM subcategories WHERE category_id = $1 AND name = $2",
        )
        .bind(category_id)
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(id)
    }

    async fn upsert_product(
        &mut self,
        subcategory_id: SubcategoryId,
        record: &ProductRecord,
        image_url: Option<&str>,
    ) -> Result<ProductId, RepositoryError> {
        let fields = &record.fields;
        let id = sqlx::query_scalar(
            r"
            INSERT INTO products
                (subcategory_id, name, description, price, stock_quantity, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name, subcategory_id) DO UPDATE SET
                description    = COALESCE(EXCLUDED.description, products.description),
                price          = EXCLUDED.price,
                stock_quantity = EXCLUDED.stock_quantity,
                image_url      = COALESCE(EXCLUDED.image_url, products.image_url),
                is_active      = EXCLUDED.is_active,
                updated_at     = now()
            RETURNING id
            ",
        )
        .bind(subcategory_id)
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(record.price.amount())
        .bind(record.stock_quantity.get())
        .bind(image_url)
        .bind(fields.is_active)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }
}
