//! In-memory repositories for tests.
//!
//! Behave like the PostgreSQL implementations: ids come from a per-table
//! sequence starting at 1 and missing rows produce `DbError::NotFound`.
//! Repositories built with [`linked`] share their tables and enforce the
//! `products.category_id` foreign key in both directions: a product cannot
//! point at a missing category, and a category cannot be deleted while
//! products point at it. Either repository can be switched into an
//! "unavailable" mode to simulate a lost database connection.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use core_types::{Category, Product};
use tokio::sync::RwLock;

use crate::repository::{CategoryRepository, ProductRepository};
use crate::DbError;

/// The error every call returns while a mock is unavailable.
pub fn unavailable_error() -> DbError {
    DbError::Query(sqlx::Error::PoolTimedOut)
}

/// A product and a category repository with the foreign key enforced between them.
pub fn linked() -> (Arc<MockProductRepository>, Arc<MockCategoryRepository>) {
    let products = Arc::new(Table::default());
    let categories = Arc::new(Table::default());
    (
        Arc::new(MockProductRepository { table: products.clone(), categories: Some(categories.clone()) }),
        Arc::new(MockCategoryRepository { table: categories, products: Some(products) }),
    )
}

#[derive(Debug, Default)]
struct Table<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl<T> Table<T> {
    fn check_available(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable_error());
        }
        Ok(())
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn contains(&self, id: i64) -> bool {
        self.rows.read().await.contains_key(&id)
    }
}

/// In-memory [`CategoryRepository`].
#[derive(Debug, Default)]
pub struct MockCategoryRepository {
    table: Arc<Table<Category>>,
    products: Option<Arc<Table<Product>>>,
}

impl MockCategoryRepository {
    /// A standalone repository; deletes are never blocked by products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the pool could not hand out a connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.table.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored categories.
    pub async fn len(&self) -> usize {
        self.table.rows.read().await.len()
    }

    pub async fn contains(&self, id: i64) -> bool {
        self.table.contains(id).await
    }

    async fn check_unreferenced(&self, id: i64) -> Result<(), DbError> {
        if let Some(products) = &self.products {
            let rows = products.rows.read().await;
            if rows.values().any(|p| p.category_id == id) {
                return Err(DbError::ForeignKeyViolation(format!(
                    "category {id} is still referenced from products"
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MockCategoryRepository {
    async fn get_all(&self) -> Result<Vec<Category>, DbError> {
        self.table.check_available()?;
        Ok(self.table.rows.read().await.values().cloned().collect())
    }

    async fn create(&self, category: &mut Category) -> Result<(), DbError> {
        self.table.check_available()?;
        category.id = self.table.allocate_id();
        self.table.rows.write().await.insert(category.id, category.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Category, DbError> {
        self.table.check_available()?;
        self.table.rows.read().await.get(&id).cloned().ok_or(DbError::NotFound)
    }

    async fn update(&self, category: &Category) -> Result<(), DbError> {
        self.table.check_available()?;
        let mut rows = self.table.rows.write().await;
        let row = rows.get_mut(&category.id).ok_or(DbError::NotFound)?;
        *row = category.clone();
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.table.check_available()?;
        if !self.table.contains(id).await {
            return Err(DbError::NotFound);
        }
        self.check_unreferenced(id).await?;
        self.table.rows.write().await.remove(&id).map(|_| ()).ok_or(DbError::NotFound)
    }
}

/// In-memory [`ProductRepository`].
#[derive(Debug, Default)]
pub struct MockProductRepository {
    table: Arc<Table<Product>>,
    categories: Option<Arc<Table<Category>>>,
}

impl MockProductRepository {
    /// A standalone repository that accepts any `category_id`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.table.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.table.rows.read().await.len()
    }

    pub async fn contains(&self, id: i64) -> bool {
        self.table.contains(id).await
    }

    async fn check_category(&self, category_id: i64) -> Result<(), DbError> {
        if let Some(categories) = &self.categories {
            if !categories.contains(category_id).await {
                return Err(DbError::ForeignKeyViolation(format!(
                    "category {category_id} does not exist"
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn get_all(&self) -> Result<Vec<Product>, DbError> {
        self.table.check_available()?;
        Ok(self.table.rows.read().await.values().cloned().collect())
    }

    async fn create(&self, product: &mut Product) -> Result<(), DbError> {
        self.table.check_available()?;
        self.check_category(product.category_id).await?;
        product.id = self.table.allocate_id();
        self.table.rows.write().await.insert(product.id, product.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, DbError> {
        self.table.check_available()?;
        self.table.rows.read().await.get(&id).cloned().ok_or(DbError::NotFound)
    }

    async fn update(&self, product: &Product) -> Result<(), DbError> {
        self.table.check_available()?;
        if !self.table.contains(product.id).await {
            return Err(DbError::NotFound);
        }
        self.check_category(product.category_id).await?;
        self.table.rows.write().await.insert(product.id, product.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.table.check_available()?;
        self.table.rows.write().await.remove(&id).map(|_| ()).ok_or(DbError::NotFound)
    }
}
