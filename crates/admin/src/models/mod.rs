//! Admin-side request and listing types.

pub mod catalog;
pub mod session;

pub use catalog::{
    CategoryInput, CategoryPatch, ProductInput, ProductListing, ProductPatch, SubcategoryInput,
    SubcategoryListing, SubcategoryPatch, UserPatch, validate_name,
};
pub use session::{CurrentAdmin, keys as session_keys};
