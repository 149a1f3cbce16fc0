//! # Storefront Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL
//! database and the single source of truth for catalog data. Nothing above
//! it caches rows; every request round-trips to storage.
//!
//! ## Public API
//!
//! - `connect`: establishes the bounded connection pool.
//! - `run_migrations`: applies the embedded schema.
//! - `ProductRepository` / `CategoryRepository`: the data-access contracts,
//!   implemented for Postgres by `PgProductRepository` / `PgCategoryRepository`
//!   and in memory by the types in `mock` (behind the `mock` feature).
//! - `DbError`: the classified errors returned from this crate.

// Declare the modules that constitute this crate.
pub mod categories;
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod products;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use categories::PgCategoryRepository;
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use products::PgProductRepository;
pub use repository::{CategoryRepository, ProductRepository};
