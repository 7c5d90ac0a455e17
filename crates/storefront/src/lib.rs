//! JagMart storefront library.
//!
//! The binary in `main.rs` is a thin wrapper around [`routes::app`]; the
//! router is exposed here so integration tests can drive it in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
