//! The service layer between the HTTP handlers and the repositories.
//!
//! Services are thin: they forward to the repository and only add the
//! business rules that do not belong in SQL. Repository errors pass through
//! untouched so the handlers can classify them.

use core_types::{Category, CoreError, Product};
use database::{CategoryRepository, DbError, ProductRepository};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] CoreError),
    #[error(transparent)]
    Database(#[from] DbError),
}

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.repo.get_all().await?)
    }

    /// Creates a product after checking it carries a category reference.
    ///
    /// The check only rejects a zero `category_id`. A non-zero id that names
    /// no category is caught by the storage foreign key.
    pub async fn create(&self, product: &mut Product) -> Result<(), ServiceError> {
        product.check_new()?;
        self.repo.create(product).await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Product, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn update(&self, product: &Product) -> Result<(), ServiceError> {
        Ok(self.repo.update(product).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.repo.delete(id).await?)
    }
}

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.repo.get_all().await?)
    }

    pub async fn create(&self, category: &mut Category) -> Result<(), ServiceError> {
        Ok(self.repo.create(category).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Category, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn update(&self, category: &Category) -> Result<(), ServiceError> {
        Ok(self.repo.update(category).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.repo.delete(id).await?)
    }
}
