//! Spreadsheet import from disk.
//!
//! Runs the same pipeline as `POST /api/import` on the admin server. Images
//! are written to `MEDIA_DIR` and addressed under `MEDIA_BASE_URL`.

use std::path::Path;

use jagmart_admin::config::MediaConfig;
use jagmart_admin::import::{ImportReport, import_workbook};
use jagmart_admin::storage::LocalImageStore;

/// # Errors
///
/// Returns an error if the file cannot be read, is not a workbook, or the
/// import fails to write.
pub async fn run(path: &Path, dry_run: bool) -> Result<ImportReport, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    tracing::info!(path = %path.display(), size = bytes.len(), dry_run, "Importing workbook");

    // Connecting loads `.env`, which may hold the media settings.
    let pool = super::connect().await?;
    let media = MediaConfig::from_env();
    let store = LocalImageStore::new(media.dir, &media.base_url);

    let report = import_workbook(&pool, &store, &bytes, dry_run).await?;

    for error in &report.errors {
        tracing::warn!("{error}");
    }

    let verb = if report.applied { "Imported" } else { "Validated" };
    tracing::info!(
        "{verb} {} categories, {} subcategories, {} products ({} errors)",
        report.categories,
        report.subcategories,
        report.products,
        report.errors.len()
    );
    Ok(report)
}
