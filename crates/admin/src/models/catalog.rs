//! Catalog form payloads and list rows.
//!
//! Create payloads carry every field; patch payloads carry only what changes.
//! In a patch, an empty `description` or `image_url` clears the column.

use serde::{Deserialize, Serialize};

use jagmart_core::{
    CategoryId, Price, Product, StockQuantity, Subcategory, SubcategoryId,
};

/// Longest accepted category, subcategory, or product name.
pub const MAX_NAME_LENGTH: usize = 200;

const fn default_active() -> bool {
    true
}

/// Trim a name and check its length.
///
/// # Errors
///
/// Returns a message suitable for a 400 response.
pub fn validate_name(name: &str) -> Result<&str, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("name must be at most {MAX_NAME_LENGTH} characters"));
    }
    Ok(name)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    /// Validate the name if it is being changed.
    ///
    /// # Errors
    ///
    /// Returns a message when the new name is blank or too long.
    pub fn validated_name(&self) -> Result<Option<&str>, String> {
        self.name.as_deref().map(validate_name).transpose()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubcategoryInput {
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Subcategory edits use the same fields as category edits.
pub type SubcategoryPatch = CategoryPatch;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub subcategory_id: SubcategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    pub stock_quantity: StockQuantity,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub price: Option<Price>,
    pub stock_quantity: Option<StockQuantity>,
}

impl ProductPatch {
    /// # Errors
    ///
    /// Returns a message when the new name is blank or too long.
    pub fn validated_name(&self) -> Result<Option<&str>, String> {
        self.name.as_deref().map(validate_name).transpose()
    }
}

/// Editable account fields. Email and role are not editable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

/// A subcategory with its parent's name, for the admin table.
#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryListing {
    #[serde(flatten)]
    pub subcategory: Subcategory,
    pub category_name: String,
}

/// A product with its subcategory and category names, for the admin table.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub subcategory_name: String,
    pub category_name: String,
}
