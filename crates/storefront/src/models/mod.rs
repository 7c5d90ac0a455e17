//! Storefront-only models.
//!
//! Catalog, cart, and user records are shared with the admin binary and live
//! in `jagmart-core`.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
