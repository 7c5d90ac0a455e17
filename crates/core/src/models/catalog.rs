//! Category, subcategory, and product records.
//!
//! The catalog is a three-level tree: a category owns subcategories, and a
//! subcategory owns products. Inactive rows stay in the database but are
//! hidden from shoppers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId, StockQuantity, SubcategoryId};

/// Image shown on a home-page category card when the category has none.
pub const DEFAULT_CATEGORY_IMAGE: &str =
    "https://images.unsplash.com/photo-1542838132-92c53300491e?q=80&w=1974&auto=format&fit=crop";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub subcategory_id: SubcategoryId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub stock_quantity: StockQuantity,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The `{id, name}` of a subcategory's parent, for breadcrumbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentCategory {
    pub id: CategoryId,
    pub name: String,
}

/// A category as shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCard {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    /// Never empty; falls back to [`DEFAULT_CATEGORY_IMAGE`].
    pub image_url: String,
    /// Active products across the category's active subcategories.
    pub item_count: i64,
}

impl CategoryCard {
    #[must_use]
    pub fn new(
        id: CategoryId,
        name: String,
        description: Option<String>,
        image_url: Option<String>,
        item_count: i64,
    ) -> Self {
        let image_url = image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_IMAGE.to_owned());
        Self {
            id,
            name,
            description,
            image_url,
            item_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSubcategory {
    pub id: SubcategoryId,
    pub name: String,
}

/// One entry of the header menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationCategory {
    pub id: CategoryId,
    pub name: String,
    pub subcategories: Vec<NavigationSubcategory>,
}

impl NavigationCategory {
    /// Group subcategories under their categories.
    ///
    /// Category order is preserved, as is the order of subcategories within
    /// each category. Subcategories whose category is not in `categories` are
    /// dropped.
    #[must_use]
    pub fn assemble(
        categories: Vec<(CategoryId, String)>,
        subcategories: Vec<(SubcategoryId, CategoryId, String)>,
    ) -> Vec<Self> {
        let mut tree: Vec<Self> = categories
            .into_iter()
            .map(|(id, name)| Self {
                id,
                name,
                subcategories: Vec::new(),
            })
            .collect();

        for (id, category_id, name) in subcategories {
            if let Some(parent) = tree.iter_mut().find(|c| c.id == category_id) {
                parent.subcategories.push(NavigationSubcategory { id, name });
            }
        }

        tree
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_card_falls_back_to_default_image() {
        let card = CategoryCard::new(CategoryId::new(1), "Dairy".into(), None, None, 4);
        assert_eq!(card.image_url, DEFAULT_CATEGORY_IMAGE);

        let blank = CategoryCard::new(
            CategoryId::new(1),
            "Dairy".into(),
            None,
            Some("  ".into()),
            4,
        );
        assert_eq!(blank.image_url, DEFAULT_CATEGORY_IMAGE);

        let own = CategoryCard::new(
            CategoryId::new(1),
            "Dairy".into(),
            None,
            Some("/media/categories/dairy.png".into()),
            4,
        );
        assert_eq!(own.image_url, "/media/categories/dairy.png");
    }

    #[test]
    fn test_assemble_navigation() {
        let categories = vec![
            (CategoryId::new(2), "Bakery".to_owned()),
            (CategoryId::new(1), "Fruits".to_owned()),
        ];
        let subcategories = vec![
            (SubcategoryId::new(10), CategoryId::new(1), "Apples".to_owned()),
            (SubcategoryId::new(11), CategoryId::new(2), "Bread".to_owned()),
            (SubcategoryId::new(12), CategoryId::new(1), "Citrus".to_owned()),
            (SubcategoryId::new(13), CategoryId::new(9), "Orphan".to_owned()),
        ];

        let tree = NavigationCategory::assemble(categories, subcategories);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "Bakery");
        assert_eq!(tree[0].subcategories.len(), 1);
        let fruit: Vec<_> = tree[1].subcategories.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(fruit, ["Apples", "Citrus"]);
    }
}
