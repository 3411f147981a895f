//! Handlers for `/api/categories`.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};

use super::created;
use crate::api::extract::ApiJson;
use crate::api::AppState;
use crate::application::{
    CategoryDto, CreateCategory, DeleteCategory, GetCategories, GetCategoryById, UpdateCategory,
};
use crate::error::Result;
use crate::models::ApiResponse;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>> {
    let categories = state.inventory.send(GetCategories).await?;
    Ok(Json(ApiResponse::ok(
        categories,
        "Categories retrieved successfully",
    )))
}

/// GET /api/categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CategoryDto>>> {
    let category = state.inventory.send(GetCategoryById { id }).await?;
    Ok(Json(ApiResponse::ok(category, "Category retrieved successfully")))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(command): ApiJson<CreateCategory>,
) -> Result<Response> {
    let category = state.inventory.send(command).await?;
    Ok(created(
        format!("/api/categories/{}", category.id),
        category,
        "Category created successfully",
    ))
}

/// PUT /api/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(mut command): ApiJson<UpdateCategory>,
) -> Result<Json<ApiResponse<CategoryDto>>> {
    command.id = id;
    let category = state.inventory.send(command).await?;
    Ok(Json(ApiResponse::ok(category, "Category updated successfully")))
}

/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.inventory.send(DeleteCategory { id }).await?;
    Ok(Json(ApiResponse::message("Category deleted successfully")))
}
