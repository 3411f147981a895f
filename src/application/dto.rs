//! Response shapes returned by handlers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Category, Product};

/// Category name reported for products without a resolvable category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: String,
    pub category_name: String,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDto {
    /// Maps a product, naming its category or [`UNCATEGORIZED`].
    pub fn new(product: Product, category_name: Option<&str>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category_id: product.category_id,
            category_name: category_name.unwrap_or(UNCATEGORIZED).to_string(),
            stock_quantity: product.stock_quantity,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

// == Pagination ==
/// One page of products and the paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProducts {
    pub data: Vec<ProductDto>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl PaginatedProducts {
    pub fn new(data: Vec<ProductDto>, total_count: u64, page_number: u32, page_size: u32) -> Self {
        Self {
            data,
            total_count,
            page_number,
            page_size,
            total_pages: total_count.div_ceil(u64::from(page_size.max(1))),
        }
    }
}

// == Dashboard ==
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    pub low_stock_products: Vec<ProductDto>,
    pub products_by_category: Vec<CategoryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category_id: String,
    pub category_name: String,
    pub product_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
}

// == Seeding ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub categories_created: usize,
    pub products_created: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PaginatedProducts::new(vec![], 0, 1, 10).total_pages, 0);
        assert_eq!(PaginatedProducts::new(vec![], 10, 1, 10).total_pages, 1);
        assert_eq!(PaginatedProducts::new(vec![], 11, 1, 10).total_pages, 2);
    }

    #[test]
    fn test_product_dto_wire_format() {
        let product = Product::new("Lamp", "Desk lamp", Decimal::new(1999, 2), "", 3);
        let json = serde_json::to_value(ProductDto::new(product, None)).unwrap();

        assert_eq!(json["price"], serde_json::json!(19.99));
        assert_eq!(json["categoryName"], UNCATEGORIZED);
        assert_eq!(json["stockQuantity"], 3);
        assert!(json["createdAt"].is_string());
    }
}
