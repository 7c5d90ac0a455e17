//! Business logic services for the storefront.
//!
//! - `auth` - shopper registration and password login
//! - `cart` - per-user cart operations
//! - `catalog` - cached navigation and home page data

pub mod auth;
pub mod cart;
pub mod catalog;

pub use auth::{AuthError, AuthService, Registration};
pub use cart::{CartError, CartService};
pub use catalog::CatalogCache;
