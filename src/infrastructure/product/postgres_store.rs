//! PostgreSQL product store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::product::{Product, ProductId, ProductPage, ProductSnapshot, ProductStore};
use crate::domain::DomainError;

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, category, is_active, \
                               tags, images, created_at, updated_at";

/// PostgreSQL implementation of [`ProductStore`] over the `products` table
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `products` table and its listing index if missing
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id VARCHAR(255) PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                stock INTEGER NOT NULL CHECK (stock >= 0),
                category TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                tags TEXT[] NOT NULL DEFAULT '{}',
                images TEXT[] NOT NULL DEFAULT '{}',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create products table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_products_created_at ON products (created_at, id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create products index: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn find_unique(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get product: {}", e)))?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn find_many(&self, skip: u64, take: u32) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY created_at, id OFFSET $1 LIMIT $2",
            PRODUCT_COLUMNS
        ))
        .bind(to_i64(skip)?)
        .bind(i64::from(take))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list products: {}", e)))?;

        rows.iter().map(row_to_product).collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count products: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn find_many_with_count(
        &self,
        skip: u64,
        take: u32,
    ) -> Result<ProductPage, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set isolation level: {}", e)))?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY created_at, id OFFSET $1 LIMIT $2",
            PRODUCT_COLUMNS
        ))
        .bind(to_i64(skip)?)
        .bind(i64::from(take))
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list products: {}", e)))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count products: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(ProductPage {
            products: rows.iter().map(row_to_product).collect::<Result<_, _>>()?,
            total: total.max(0) as u64,
        })
    }

    async fn create(&self, product: &Product) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock, category, is_active,
                                  tags, images, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(product.id().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(stock_to_i32(product.stock())?)
        .bind(product.category())
        .bind(product.is_active())
        .bind(product.tags())
        .bind(product.images())
        .bind(product.created_at())
        .bind(product.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create product: {}", e)))?;

        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5, category = $6,
                is_active = $7, tags = $8, images = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(product.id().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(stock_to_i32(product.stock())?)
        .bind(product.category())
        .bind(product.is_active())
        .bind(product.tags())
        .bind(product.images())
        .bind(product.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update product: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Product '{}' not found",
                product.id()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete product: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Product '{}' not found", id)));
        }

        Ok(())
    }
}

fn to_i64(value: u64) -> Result<i64, DomainError> {
    i64::try_from(value).map_err(|_| DomainError::storage(format!("Offset out of range: {}", value)))
}

fn stock_to_i32(stock: u32) -> Result<i32, DomainError> {
    i32::try_from(stock).map_err(|_| DomainError::storage(format!("Stock out of range: {}", stock)))
}

fn row_to_product(row: &PgRow) -> Result<Product, DomainError> {
    let stock: i32 = row.get("stock");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let snapshot = ProductSnapshot {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        stock: u32::try_from(stock)
            .map_err(|_| DomainError::storage(format!("Invalid stock in row: {}", stock)))?,
        category: row.get("category"),
        is_active: row.get("is_active"),
        tags: row.get("tags"),
        images: row.get("images"),
        created_at,
        updated_at,
    };

    Product::from_snapshot(snapshot)
        .map_err(|e| DomainError::storage(format!("Invalid product row: {}", e)))
}
