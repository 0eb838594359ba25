//! sc-db - Catalog access layer for Schemacheck
//!
//! This crate provides the `Catalog` trait, a DuckDB implementation that
//! reads the engine's `duckdb_*()` catalog functions, and (behind the
//! `test-support` feature) an in-memory catalog for tests.

pub mod duckdb;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod traits;

pub use self::duckdb::DuckDbCatalog;
pub use error::{DbError, DbResult};
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryCatalog;
pub use traits::Catalog;
