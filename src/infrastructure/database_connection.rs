//! Database connection and pool management
//!
//! Handles SQLite connections through sqlx, bootstrapping the database
//! file and applying the schema on startup.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db_path = if config.url.starts_with("sqlite://") {
            config.url.trim_start_matches("sqlite://")
        } else {
            config.url.trim_start_matches("sqlite:")
        };

        let in_memory = db_path == ":memory:" || db_path.contains("mode=memory");
        if !in_memory {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("invalid database URL: {}", config.url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("failed to open database pool")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema if it does not exist yet. The composite unique
    /// index over (category, name, price) is the authoritative duplicate
    /// guard; the repository's `exists` check is only a pre-filter.
    pub async fn migrate(&self) -> Result<()> {
        let create_products_sql = r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                price TEXT NOT NULL,
                price_minor INTEGER,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                UNIQUE (category, name, price)
            )
        "#;

        let create_indexes_sql = r#"
            CREATE INDEX IF NOT EXISTS idx_products_category ON products (category)
        "#;

        sqlx::query(create_products_sql).execute(&self.pool).await?;
        sqlx::query(create_indexes_sql).execute(&self.pool).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_file_and_schema() -> Result<()> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("nested").join("test.db");
        let config = DatabaseConfig {
            url: format!("sqlite:{}", db_path.display()),
            max_connections: 2,
        };

        let db = DatabaseConnection::new(&config).await?;
        db.migrate().await?;

        let table: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'products'",
        )
        .fetch_optional(db.pool())
        .await?;
        assert_eq!(table.as_deref(), Some("products"));

        Ok(())
    }

    #[tokio::test]
    async fn migrate_is_idempotent() -> Result<()> {
        let temp_dir = tempdir()?;
        let config = DatabaseConfig {
            url: format!("sqlite:{}", temp_dir.path().join("test.db").display()),
            max_connections: 1,
        };

        let db = DatabaseConnection::new(&config).await?;
        db.migrate().await?;
        db.migrate().await?;

        Ok(())
    }
}
