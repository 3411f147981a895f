//! Product entity.

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{new_id, round_money, timestamp};

/// A stocked product, stored in the `products` collection.
///
/// Serialized field names are the stored document's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// Empty when the product has no category.
    #[serde(default)]
    pub category_id: String,
    pub stock_quantity: i32,
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product with a fresh id; the price is rounded to cents.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category_id: impl Into<String>,
        stock_quantity: i32,
    ) -> Self {
        let now = timestamp();
        Self {
            id: new_id(),
            name: name.into(),
            description: description.into(),
            price: round_money(price),
            category_id: category_id.into(),
            stock_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Inventory value held for this product (price × stock).
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock_quantity)
    }

    /// True when stock is strictly below `threshold`.
    pub fn is_low_stock(&self, threshold: i32) -> bool {
        self.stock_quantity < threshold
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.price = round_money(price);
    }

    /// Marks the product as modified now.
    pub fn touch(&mut self) {
        self.updated_at = timestamp();
    }
}
