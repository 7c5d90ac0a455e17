//! JagMart Admin library.
//!
//! The back-office API as a library, so the CLI can reuse the repositories,
//! password hashing, and the spreadsheet import pipeline.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - Catalog and user repositories
//! - [`import`] - `.xlsx` bulk import
//! - [`storage`] - Image storage
//! - [`routes`] - HTTP API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
