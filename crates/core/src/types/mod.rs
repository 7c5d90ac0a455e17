//! Core types for JagMart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod folder;
pub mod id;
pub mod price;
pub mod quantity;
pub mod role;

pub use email::{Email, EmailError};
pub use folder::{ImageFolder, ImageFolderError};
pub use id::*;
pub use price::{Price, PriceError, format_rupees};
pub use quantity::{Quantity, QuantityError, StockQuantity};
pub use role::RoleName;
