//! Repository Module
//!
//! Async persistence boundary for products and categories. Handlers depend
//! on the traits only; the document-store implementations and the caching
//! decorator plug in behind them.

mod cached;
mod document;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Category, Product};
use crate::store::Result;

pub use cached::{category_key, CachedCategoryRepository, CategoryCacheValue, ALL_CATEGORIES_KEY};
pub use document::{DocumentCategoryRepository, DocumentProductRepository};

// == Product Filter ==
/// Criteria for product listings. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring matched against name or description
    pub search: Option<String>,
    /// Exact category id
    pub category_id: Option<String>,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>>;

    /// One page of matching products, newest first, plus the total match count.
    ///
    /// `page` is 1-based; callers pass already-normalized values.
    async fn find_page(
        &self,
        filter: &ProductFilter,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Product>, u64)>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;
    async fn find_by_category(&self, category_id: &str) -> Result<Vec<Product>>;

    /// Products with stock strictly below `threshold`, lowest stock first.
    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<Product>>;

    async fn insert(&self, product: &Product) -> Result<()>;

    /// Replaces the stored product. Returns false if it does not exist.
    async fn update(&self, product: &Product) -> Result<bool>;

    /// Returns false if the product does not exist.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn count(&self) -> Result<u64>;

    /// Σ(price × stock) over all products.
    async fn total_value(&self) -> Result<Decimal> {
        let products = self.find_all().await?;
        Ok(products.iter().map(Product::stock_value).sum())
    }
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>>;

    /// Categories whose id is in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Category>>;
    async fn insert(&self, category: &Category) -> Result<()>;

    /// Returns false if the category does not exist.
    async fn update(&self, category: &Category) -> Result<bool>;

    /// Returns false if the category does not exist.
    async fn delete(&self, id: &str) -> Result<bool>;
}
