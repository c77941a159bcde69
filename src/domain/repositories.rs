//! Store trait for product persistence
//!
//! The crawl pipeline and the API layer both go through this seam; the
//! SQLite implementation lives in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::product::{CandidateProduct, Product, ProductPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The composite uniqueness constraint on (category, name, price)
    /// rejected a write. Non-fatal for the crawl pipeline: the enclosing
    /// page batch is rolled back and the run continues.
    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Exact-match duplicate check on all three identity fields, no
    /// normalization. A pre-filter only; the schema constraint decides.
    async fn exists(&self, category: &str, name: &str, price: &str) -> Result<bool, StoreError>;

    /// Persist one page's candidates as a single transaction. Either all
    /// rows are committed or none are. Empty input is a no-op.
    async fn insert_batch(&self, candidates: &[CandidateProduct]) -> Result<usize, StoreError>;

    /// Persist a single product and return the stored row.
    async fn insert(&self, candidate: &CandidateProduct) -> Result<Product, StoreError>;

    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Apply a partial update; returns `None` for an unknown id. A patch
    /// that changes the price re-derives the minor-unit value.
    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, StoreError>;

    /// Delete by id; returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
