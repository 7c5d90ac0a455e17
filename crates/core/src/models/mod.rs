//! Records shared by the storefront and admin binaries.

pub mod cart;
pub mod catalog;
pub mod user;

pub use cart::{Cart, CartLine};
pub use catalog::{
    Category, CategoryCard, DEFAULT_CATEGORY_IMAGE, NavigationCategory, NavigationSubcategory,
    ParentCategory, Product, Subcategory,
};
pub use user::User;
