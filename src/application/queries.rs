//! Queries: read-only requests.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use super::{
    CategoryDto, CategoryStats, DashboardStats, Handler, Inventory, PaginatedProducts, ProductDto,
};
use crate::domain::{round_money, Category, Product};
use crate::error::Result;
use crate::repository::ProductFilter;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

// == Paging ==
/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Clamps raw paging input: page < 1 becomes 1, a size below 1 becomes
    /// the default and a size above the maximum becomes the maximum.
    pub fn normalize(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
        let page_size = match page_size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE)) {
            size if size < 1 => DEFAULT_PAGE_SIZE,
            size if size > i64::from(MAX_PAGE_SIZE) => MAX_PAGE_SIZE,
            size => size as u32,
        };
        Self { page, page_size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::normalize(None, None)
    }
}

// == Products ==
#[derive(Debug, Clone, Default)]
pub struct GetProducts {
    pub page: PageRequest,
    pub search: Option<String>,
    pub category_id: Option<String>,
}

#[async_trait]
impl Handler<GetProducts> for Inventory {
    type Output = PaginatedProducts;

    async fn handle(&self, query: GetProducts) -> Result<PaginatedProducts> {
        let filter = ProductFilter {
            search: query.search,
            category_id: query.category_id,
        };
        let PageRequest { page, page_size } = query.page;

        let (products, total) = self.products.find_page(&filter, page, page_size).await?;
        debug!(page, page_size, total, "Products listed");

        let data = self.to_dtos(products).await?;
        Ok(PaginatedProducts::new(data, total, page, page_size))
    }
}

#[derive(Debug, Clone)]
pub struct GetProductById {
    pub id: String,
}

#[async_trait]
impl Handler<GetProductById> for Inventory {
    type Output = ProductDto;

    async fn handle(&self, query: GetProductById) -> Result<ProductDto> {
        let product = self.require_product(&query.id).await?;
        self.to_dto(product).await
    }
}

/// Products below `threshold`, or the configured threshold when absent.
#[derive(Debug, Clone, Default)]
pub struct GetLowStockProducts {
    pub threshold: Option<i32>,
}

#[async_trait]
impl Handler<GetLowStockProducts> for Inventory {
    type Output = Vec<ProductDto>;

    async fn handle(&self, query: GetLowStockProducts) -> Result<Vec<ProductDto>> {
        let threshold = query.threshold.unwrap_or(self.low_stock_threshold);
        let products = self.products.find_low_stock(threshold).await?;
        self.to_dtos(products).await
    }
}

// == Categories ==
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCategories;

#[async_trait]
impl Handler<GetCategories> for Inventory {
    type Output = Vec<CategoryDto>;

    async fn handle(&self, _query: GetCategories) -> Result<Vec<CategoryDto>> {
        let categories = self.categories.find_all().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }
}

#[derive(Debug, Clone)]
pub struct GetCategoryById {
    pub id: String,
}

#[async_trait]
impl Handler<GetCategoryById> for Inventory {
    type Output = CategoryDto;

    async fn handle(&self, query: GetCategoryById) -> Result<CategoryDto> {
        Ok(self.require_category(&query.id).await?.into())
    }
}

// == Dashboard ==
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDashboardStats;

#[async_trait]
impl Handler<GetDashboardStats> for Inventory {
    type Output = DashboardStats;

    async fn handle(&self, _query: GetDashboardStats) -> Result<DashboardStats> {
        let products = self.products.find_all().await?;
        let categories = self.categories.find_all().await?;
        Ok(build_dashboard(
            products,
            &categories,
            self.low_stock_threshold,
        ))
    }
}

/// Aggregates products in memory.
///
/// Exactly one row per category, even when empty. Products whose category
/// is blank or unknown count toward the totals but toward no row. Low-stock
/// products are ordered by ascending stock.
pub fn build_dashboard(
    products: Vec<Product>,
    categories: &[Category],
    low_stock_threshold: i32,
) -> DashboardStats {
    let names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut per_category: HashMap<&str, (u64, Decimal)> = HashMap::new();
    let mut total_value = Decimal::ZERO;

    for product in &products {
        let value = product.stock_value();
        total_value += value;

        let bucket = per_category.entry(product.category_id.as_str()).or_default();
        bucket.0 += 1;
        bucket.1 += value;
    }

    let products_by_category: Vec<CategoryStats> = categories
        .iter()
        .map(|c| {
            let (count, value) = per_category.get(c.id.as_str()).copied().unwrap_or_default();
            CategoryStats {
                category_id: c.id.clone(),
                category_name: c.name.clone(),
                product_count: count,
                total_value: round_money(value),
            }
        })
        .collect();

    let total_products = products.len() as u64;
    let mut low_stock: Vec<ProductDto> = products
        .into_iter()
        .filter(|p| p.is_low_stock(low_stock_threshold))
        .map(|p| {
            let name = names.get(p.category_id.as_str()).copied();
            ProductDto::new(p, name)
        })
        .collect();
    low_stock.sort_by_key(|p| p.stock_quantity);

    DashboardStats {
        total_products,
        total_value: round_money(total_value),
        low_stock_products: low_stock,
        products_by_category,
    }
}
