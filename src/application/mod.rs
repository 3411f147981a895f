//! Application Module
//!
//! Command and query handlers over the repositories. Commands mutate,
//! queries read; each request type has exactly one [`Handler`] impl on
//! [`Inventory`].

mod commands;
mod dto;
mod queries;
mod seed;
mod validation;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Category, Product};
use crate::error::{AppError, Result};
use crate::repository::{CategoryRepository, ProductRepository};

pub use commands::{
    CreateCategory, CreateProduct, DeleteCategory, DeleteProduct, UpdateCategory, UpdateProduct,
    UpdateStock,
};
pub use dto::{
    CategoryDto, CategoryStats, DashboardStats, PaginatedProducts, ProductDto, SeedSummary,
    UNCATEGORIZED,
};
pub use queries::{
    build_dashboard, GetCategories, GetCategoryById, GetDashboardStats, GetLowStockProducts,
    GetProductById, GetProducts, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use seed::SeedSampleData;
pub use validation::{Rule, ValidationErrors};

// == Handler Trait ==
/// Handles one request type.
#[async_trait]
pub trait Handler<R: Send + 'static>: Send + Sync {
    type Output: Send;

    async fn handle(&self, request: R) -> Result<Self::Output>;
}

// == Inventory ==
/// Entry point for every command and query.
pub struct Inventory {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    low_stock_threshold: i32,
}

impl Inventory {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        low_stock_threshold: i32,
    ) -> Self {
        Self {
            products,
            categories,
            low_stock_threshold,
        }
    }

    /// Sends `request` to its handler.
    pub async fn send<R>(&self, request: R) -> Result<<Self as Handler<R>>::Output>
    where
        R: Send + 'static,
        Self: Handler<R>,
    {
        <Self as Handler<R>>::handle(self, request).await
    }

    /// Number of stored products; used by readiness checks.
    pub async fn product_count(&self) -> Result<u64> {
        Ok(self.products.count().await?)
    }

    // == Lookups ==
    async fn require_product(&self, id: &str) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product '{id}' not found")))
    }

    async fn require_category(&self, id: &str) -> Result<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{id}' not found")))
    }

    async fn category_exists(&self, id: &str) -> Result<bool> {
        Ok(self.categories.find_by_id(id).await?.is_some())
    }

    // == Mapping ==
    /// Resolves category names for `products` with one batched lookup.
    async fn category_names(&self, products: &[Product]) -> Result<HashMap<String, String>> {
        let ids: Vec<String> = products
            .iter()
            .map(|p| p.category_id.as_str())
            .filter(|id| !id.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let categories = self.categories.find_by_ids(&ids).await?;
        Ok(categories.into_iter().map(|c| (c.id, c.name)).collect())
    }

    async fn to_dtos(&self, products: Vec<Product>) -> Result<Vec<ProductDto>> {
        let names = self.category_names(&products).await?;
        Ok(products
            .into_iter()
            .map(|p| {
                let name = names.get(&p.category_id).map(String::as_str);
                ProductDto::new(p, name)
            })
            .collect())
    }

    async fn to_dto(&self, product: Product) -> Result<ProductDto> {
        let name = if product.category_id.is_empty() {
            None
        } else {
            self.categories
                .find_by_id(&product.category_id)
                .await?
                .map(|c| c.name)
        };
        Ok(ProductDto::new(product, name.as_deref()))
    }
}
