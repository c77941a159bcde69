//! SQLite-backed product repository
//!
//! Implements the domain store trait with runtime-checked sqlx queries.
//! Batch inserts run in one transaction per listing page; a uniqueness
//! violation rolls the whole page back and surfaces as a typed error.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::product::{parse_price_minor, CandidateProduct, Product, ProductPatch};
use crate::domain::repositories::{ProductStore, StoreError};

#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        category: row.try_get("category")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        price_minor: row.try_get("price_minor")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn classify(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl ProductStore for SqliteProductRepository {
    async fn exists(&self, category: &str, name: &str, price: &str) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category = ? AND name = ? AND price = ?",
        )
        .bind(category)
        .bind(name)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn insert_batch(&self, candidates: &[CandidateProduct]) -> Result<usize, StoreError> {
        if candidates.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        for candidate in candidates {
            sqlx::query(
                r#"
                INSERT INTO products (category, name, price, price_minor, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&candidate.category)
            .bind(&candidate.name)
            .bind(&candidate.price)
            .bind(candidate.price_minor)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        }
        tx.commit().await?;

        Ok(candidates.len())
    }

    async fn insert(&self, candidate: &CandidateProduct) -> Result<Product, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (category, name, price, price_minor, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&candidate.category)
        .bind(&candidate.name)
        .bind(&candidate.price)
        .bind(candidate.price_minor)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(Product {
            id: result.last_insert_rowid(),
            category: candidate.category.clone(),
            name: candidate.name.clone(),
            price: candidate.price.clone(),
            price_minor: candidate.price_minor,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, category, name, price, price_minor, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, category, name, price, price_minor, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row).transpose()?)
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, StoreError> {
        let Some(mut product) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(category) = &patch.category {
            product.category = category.clone();
        }
        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(price) = &patch.price {
            product.price = price.clone();
            product.price_minor = parse_price_minor(price);
        }
        product.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE products
            SET category = ?, name = ?, price = ?, price_minor = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.category)
        .bind(&product.name)
        .bind(&product.price)
        .bind(product.price_minor)
        .bind(product.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(Some(product))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
