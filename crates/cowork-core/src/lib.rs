//! Cowork Core - Domain models, query parameters and configuration
//!
//! This crate contains the directory's domain types and the pure logic shared
//! by the API server, the storage adapters and the discovery client.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod validation;

pub use error::{CoworkError, Result};
