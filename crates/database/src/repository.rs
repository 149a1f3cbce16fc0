use crate::DbError;
use async_trait::async_trait;
use core_types::{Category, Product};

/// Data access for the `products` table.
///
/// Each method issues exactly one SQL statement. No method retries or opens
/// a transaction that outlives the call.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetches every product, ordered by id.
    async fn get_all(&self) -> Result<Vec<Product>, DbError>;

    /// Inserts `product` and writes the generated id back into it.
    async fn create(&self, product: &mut Product) -> Result<(), DbError>;

    /// Fetches one product, or `DbError::NotFound`.
    async fn get_by_id(&self, id: i64) -> Result<Product, DbError>;

    /// Overwrites every column of the row identified by `product.id`.
    async fn update(&self, product: &Product) -> Result<(), DbError>;

    /// Removes the row, or returns `DbError::NotFound` if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<(), DbError>;
}

/// Data access for the `categories` table. Same contract as [`ProductRepository`].
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Category>, DbError>;

    async fn create(&self, category: &mut Category) -> Result<(), DbError>;

    async fn get_by_id(&self, id: i64) -> Result<Category, DbError>;

    async fn update(&self, category: &Category) -> Result<(), DbError>;

    async fn delete(&self, id: i64) -> Result<(), DbError>;
}
