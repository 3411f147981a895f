//! Request DTOs for the inventory API
//!
//! Query strings and bodies that map onto handler requests.

use serde::Deserialize;

use crate::application::{GetLowStockProducts, GetProducts, PageRequest};

/// Query string of `GET /api/products`.
///
/// Paging values are accepted as given and normalized afterwards, so
/// `page=0` or `pageSize=1000` are clamped rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub category_id: Option<String>,
}

impl From<ProductListParams> for GetProducts {
    fn from(params: ProductListParams) -> Self {
        Self {
            page: PageRequest::normalize(params.page, params.page_size),
            search: params.search.filter(|s| !s.trim().is_empty()),
            category_id: params.category_id.filter(|c| !c.is_empty()),
        }
    }
}

/// Query string of `GET /api/products/low-stock`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LowStockParams {
    pub threshold: Option<i32>,
}

impl From<LowStockParams> for GetLowStockProducts {
    fn from(params: LowStockParams) -> Self {
        Self {
            threshold: params.threshold,
        }
    }
}

/// Body of `PATCH /api/products/:id/stock`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockUpdateRequest {
    pub quantity: i32,
}
