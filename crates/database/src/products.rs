use crate::repository::ProductRepository;
use crate::DbError;
use async_trait::async_trait;
use core_types::Product;
use sqlx::postgres::PgPool;

/// PostgreSQL-backed [`ProductRepository`].
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Creates a new repository over a shared connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn get_all(&self) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock, category_id FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn create(&self, product: &mut Product) -> Result<(), DbError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name, price, stock, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.category_id)
        .fetch_one(&self.pool)
        .await?;

        product.id = id;
        tracing::debug!(product_id = id, "Product created.");
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, DbError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock, category_id FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn update(&self, product: &Product) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, price = $2, stock = $3, category_id = $4
            WHERE id = $5
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.category_id)
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
