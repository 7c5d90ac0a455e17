//! Bulk catalog import from `.xlsx` workbooks.
//!
//! An import runs in three steps:
//!
//! 1. [`workbook::read_workbook`] turns the file into header-keyed rows.
//! 2. [`rows::validate_sheets`] checks every row and decodes embedded images.
//! 3. [`apply::apply`] upserts the records in one transaction, resolving
//!    parents by name.
//!
//! Nothing is written unless every row is valid.

pub mod apply;
pub mod image;
pub mod rows;
pub mod workbook;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::storage::{ImageStore, StorageError};

pub use apply::{CatalogSink, PgCatalogSink};
pub use rows::ValidatedImport;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The upload is not a readable workbook.
    #[error("could not read workbook: {0}")]
    Workbook(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of an import.
///
/// Counts are the rows written when `applied` is true, and the rows that
/// passed validation otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub categories: usize,
    pub subcategories: usize,
    pub products: usize,
    pub errors: Vec<String>,
    pub applied: bool,
}

impl ImportReport {
    /// Report for an import that was validated but not written.
    #[must_use]
    pub fn not_applied(import: &ValidatedImport) -> Self {
        Self {
            categories: import.categories.len(),
            subcategories: import.subcategories.len(),
            products: import.products.len(),
            errors: import.errors.clone(),
            applied: false,
        }
    }
}

/// Read and validate a workbook without touching the database.
///
/// # Errors
///
/// Returns `ImportError::Workbook` if the bytes are not a workbook.
pub fn validate_workbook(bytes: &[u8]) -> Result<ValidatedImport, ImportError> {
    let sheets = workbook::read_workbook(bytes)?;
    Ok(rows::validate_sheets(&sheets))
}

/// Validate a workbook and, unless `dry_run` is set or a row is invalid,
/// write it to the catalog.
///
/// # Errors
///
/// Returns `ImportError` if the workbook is unreadable or a database or
/// storage operation fails. Failures roll the whole import back.
pub async fn import_workbook<I: ImageStore>(
    pool: &PgPool,
    store: &I,
    bytes: &[u8],
    dry_run: bool,
) -> Result<ImportReport, ImportError> {
    let validated = validate_workbook(bytes)?;

    if !validated.is_valid() {
        tracing::info!(errors = validated.errors.len(), "Import rejected by validation");
        return Ok(ImportReport::not_applied(&validated));
    }
    if dry_run {
        return Ok(ImportReport::not_applied(&validated));
    }

    let mut sink = PgCatalogSink::begin(pool).await?;
    let report = apply::apply(&mut sink, store, &validated).await?;
    sink.commit().await?;

    tracing::info!(
        categories = report.categories,
        subcategories = report.subcategories,
        products = report.products,
        unresolved = report.errors.len(),
        "Import applied"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::import::rows::CategoryRecord;

    #[test]
    fn test_not_applied_report_counts_valid_rows() {
        let import = ValidatedImport {
            categories: vec![CategoryRecord {
                fields: rows::CommonFields {
                    row: 2,
                    name: "Beverages".to_string(),
                    description: None,
                    image: None,
                    is_active: true,
                },
            }],
            errors: vec!["Row 3 in Categories: name is required".to_string()],
            ..ValidatedImport::default()
        };

        let report = ImportReport::not_applied(&import);
        assert!(!report.applied);
        assert_eq!(report.categories, 1);
        assert_eq!(report.products, 0);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_validate_workbook_from_xlsx() {
        let import = validate_workbook(include_bytes!("../../tests/fixtures/catalog.xlsx")).unwrap();

        let categories: Vec<_> = import
            .categories
            .iter()
            .map(|c| (c.fields.name.as_str(), c.fields.row, c.fields.is_active))
            .collect();
        assert_eq!(categories, [("Dairy", 2, true), ("Bakery", 4, false)]);

        assert_eq!(import.subcategories.len(), 1);
        assert_eq!(import.subcategories[0].category_name, "Dairy");

        assert_eq!(import.products.len(), 1);
        assert_eq!(import.products[0].fields.name, "Toned Milk 1L");
        assert_eq!(import.products[0].stock_quantity.get(), 10);

        assert_eq!(
            import.errors,
            [
                "Row 3 in Products: price must be a positive number",
                "Row 5 in Products: stock_quantity must be a whole number of at least 0; \
                 name is required",
            ]
        );
        assert!(!import.is_valid());
    }

    #[test]
    fn test_validate_workbook_rejects_non_workbook() {
        assert!(matches!(
            validate_workbook(b"name,price\nMilk,54\n"),
            Err(ImportError::Workbook(_))
        ));
    }
}
