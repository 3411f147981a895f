//! Handlers for `/api/dashboard`.

use axum::{extract::State, Json};

use crate::api::AppState;
use crate::application::{DashboardStats, GetDashboardStats, SeedSampleData, SeedSummary};
use crate::error::Result;
use crate::models::ApiResponse;

/// GET /api/dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>> {
    let stats = state.inventory.send(GetDashboardStats).await?;
    Ok(Json(ApiResponse::ok(stats, "Statistics retrieved successfully")))
}

/// POST /api/dashboard/seed
pub async fn seed_sample_data(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SeedSummary>>> {
    let summary = state.inventory.send(SeedSampleData).await?;
    let message = format!(
        "Sample data created: {} categories and {} products",
        summary.categories_created, summary.products_created
    );
    Ok(Json(ApiResponse::ok(summary, message)))
}
