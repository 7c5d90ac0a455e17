//! JagMart Core - Shared types library.
//!
//! This crate provides common types used across all JagMart components:
//! - `storefront` - Public catalog and cart API
//! - `admin` - Back-office API for catalog management and bulk import
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Database rows are converted into these types by
//! the repositories in each binary.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, quantities, emails, and roles
//! - [`models`] - Catalog, cart, and user records shared by storefront and admin

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
