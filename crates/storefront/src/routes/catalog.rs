//! Catalog browsing handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use jagmart_core::{
    CategoryCard, CategoryId, NavigationCategory, Product, ProductId, SubcategoryId,
};

use crate::db::CatalogRepository;
use crate::db::catalog::{CategoryHeader, ProductFilter, SubcategoryHeader};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: CategoryHeader,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct SubcategoryPage {
    pub subcategory: SubcategoryHeader,
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
    pub category: Option<CategoryId>,
}

/// GET /api/navigation
pub async fn navigation(State(state): State<AppState>) -> Result<Json<Vec<NavigationCategory>>> {
    let tree = state.catalog_cache().navigation(state.pool()).await?;
    Ok(Json(tree.as_ref().clone()))
}

/// GET /api/home/categories
pub async fn home_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryCard>>> {
    let cards = state.catalog_cache().category_cards(state.pool()).await?;
    Ok(Json(cards.as_ref().clone()))
}

/// GET /api/categories/{id}
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<CategoryPage>> {
    let repo = CatalogRepository::new(state.pool());
    let category = repo
        .active_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;
    let products = repo.products_in_category(id).await?;

    Ok(Json(CategoryPage { category, products }))
}

/// GET /api/subcategories/{id}
#[instrument(skip(state))]
pub async fn subcategory(
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
) -> Result<Json<SubcategoryPage>> {
    let repo = CatalogRepository::new(state.pool());
    let subcategory = repo
        .active_subcategory(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subcategory".to_string()))?;
    let products = repo.products_in_subcategory(id).await?;

    Ok(Json(SubcategoryPage {
        subcategory,
        products,
    }))
}

/// GET /api/products?q=&category=
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        name_contains: query.q,
        category_id: query.category,
    };
    let products = CatalogRepository::new(state.pool())
        .search_products(&filter)
        .await?;

    Ok(Json(products))
}

/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    CatalogRepository::new(state.pool())
        .active_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
}
