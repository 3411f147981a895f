//! Handlers for `/api/products`.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};

use super::created;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::AppState;
use crate::application::{
    CreateProduct, DeleteProduct, GetLowStockProducts, GetProductById, GetProducts,
    PaginatedProducts, ProductDto, UpdateProduct, UpdateStock,
};
use crate::error::Result;
use crate::models::{ApiResponse, LowStockParams, ProductListParams, StockUpdateRequest};

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProductListParams>,
) -> Result<Json<ApiResponse<PaginatedProducts>>> {
    let page = state.inventory.send(GetProducts::from(params)).await?;
    Ok(Json(ApiResponse::ok(page, "Products retrieved successfully")))
}

/// GET /api/products/low-stock
pub async fn low_stock_products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LowStockParams>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>> {
    let products = state
        .inventory
        .send(GetLowStockProducts::from(params))
        .await?;
    Ok(Json(ApiResponse::ok(
        products,
        "Low stock products retrieved successfully",
    )))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDto>>> {
    let product = state.inventory.send(GetProductById { id }).await?;
    Ok(Json(ApiResponse::ok(product, "Product retrieved successfully")))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(command): ApiJson<CreateProduct>,
) -> Result<Response> {
    let product = state.inventory.send(command).await?;
    Ok(created(
        format!("/api/products/{}", product.id),
        product,
        "Product created successfully",
    ))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(mut command): ApiJson<UpdateProduct>,
) -> Result<Json<ApiResponse<ProductDto>>> {
    command.id = id;
    let product = state.inventory.send(command).await?;
    Ok(Json(ApiResponse::ok(product, "Product updated successfully")))
}

/// PATCH /api/products/:id/stock
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StockUpdateRequest>,
) -> Result<Json<ApiResponse<ProductDto>>> {
    let product = state
        .inventory
        .send(UpdateStock {
            id,
            quantity: body.quantity,
        })
        .await?;
    Ok(Json(ApiResponse::ok(product, "Stock updated successfully")))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.inventory.send(DeleteProduct { id }).await?;
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}
