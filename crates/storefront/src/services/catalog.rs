//! Cached catalog data for the storefront shell.
//!
//! The header menu and the home page cards are requested on every page view
//! but change only when an admin edits the catalog, so both are cached for
//! five minutes. Admin writes happen in another process; shoppers may see a
//! stale menu for up to one TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use jagmart_core::{CategoryCard, NavigationCategory};

use crate::db::{CatalogRepository, RepositoryError};

const CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Navigation,
    CategoryCards,
}

#[derive(Debug, Clone)]
enum CacheValue {
    Navigation(Arc<Vec<NavigationCategory>>),
    CategoryCards(Arc<Vec<CategoryCard>>),
}

/// In-memory cache in front of the catalog queries that build the shell.
#[derive(Clone)]
pub struct CatalogCache {
    cache: Cache<CacheKey, CacheValue>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(16).time_to_live(ttl).build(),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    pub async fn navigation(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<NavigationCategory>>, RepositoryError> {
        if let Some(CacheValue::Navigation(tree)) = self.cache.get(&CacheKey::Navigation).await {
            debug!("Cache hit for navigation");
            return Ok(tree);
        }

        let tree = Arc::new(CatalogRepository::new(pool).navigation().await?);
        self.cache
            .insert(CacheKey::Navigation, CacheValue::Navigation(Arc::clone(&tree)))
            .await;
        Ok(tree)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    pub async fn category_cards(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<CategoryCard>>, RepositoryError> {
        if let Some(CacheValue::CategoryCards(cards)) =
            self.cache.get(&CacheKey::CategoryCards).await
        {
            debug!("Cache hit for category cards");
            return Ok(cards);
        }

        let cards = Arc::new(CatalogRepository::new(pool).category_cards().await?);
        self.cache
            .insert(
                CacheKey::CategoryCards,
                CacheValue::CategoryCards(Arc::clone(&cards)),
            )
            .await;
        Ok(cards)
    }
}
