//! Health checks. Never authenticated.

use std::path::Path;

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::api::AppState;
use crate::auth::IdentityProvider;
use crate::models::{
    DependencyStatus, DetailedHealthResponse, HealthResponse, LivenessResponse, ReadinessResponse,
};

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.uptime_seconds()))
}

/// GET /health/live
pub async fn live() -> Json<LivenessResponse> {
    Json(LivenessResponse::alive())
}

/// GET /health/ready
///
/// 503 when the document store cannot answer a count.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let report = ReadinessResponse::new(vec![
        document_store_check(&state).await,
        category_cache_check(&state).await,
    ]);
    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// GET /health/detailed
///
/// Always 200; a failed check only degrades the reported status.
pub async fn detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let mut checks = vec![
        document_store_check(&state).await,
        data_directory_check(state.data_dir.as_deref()).await,
        category_cache_check(&state).await,
    ];
    if let Some(identity) = &state.identity {
        checks.push(identity_check(identity).await);
    }

    let report = DetailedHealthResponse::new(state.uptime_seconds(), checks);
    if report.status != "healthy" {
        warn!(status = %report.status, "Detailed health check degraded");
    }
    Json(report)
}

// == Checks ==
async fn document_store_check(state: &AppState) -> DependencyStatus {
    match state.inventory.product_count().await {
        Ok(count) => DependencyStatus {
            name: "documentStore".to_string(),
            healthy: true,
            detail: Some(format!("{count} products")),
        },
        Err(e) => {
            warn!(error = %e, "Document store check failed");
            DependencyStatus {
                name: "documentStore".to_string(),
                healthy: false,
                detail: Some(e.to_string()),
            }
        }
    }
}

/// Healthy when snapshots are disabled, or the directory exists and is writable.
async fn data_directory_check(dir: Option<&Path>) -> DependencyStatus {
    let name = "dataDirectory".to_string();
    let Some(dir) = dir else {
        return DependencyStatus {
            name,
            healthy: true,
            detail: Some("in-memory, no snapshots".to_string()),
        };
    };

    let (healthy, detail) = match tokio::fs::metadata(dir).await {
        Ok(meta) if !meta.is_dir() => (false, format!("{} is not a directory", dir.display())),
        Ok(meta) if meta.permissions().readonly() => {
            (false, format!("{} is read-only", dir.display()))
        }
        Ok(_) => (true, dir.display().to_string()),
        Err(e) => (false, format!("{}: {e}", dir.display())),
    };
    DependencyStatus {
        name,
        healthy,
        detail: Some(detail),
    }
}

async fn category_cache_check(state: &AppState) -> DependencyStatus {
    let cache = state.category_cache.read().await;
    let stats = cache.stats();
    DependencyStatus {
        name: "categoryCache".to_string(),
        healthy: true,
        detail: Some(format!(
            "{} entries, hit rate {:.2}, ttl {}s",
            stats.total_entries,
            stats.hit_rate(),
            cache.default_ttl()
        )),
    }
}

async fn identity_check(identity: &IdentityProvider) -> DependencyStatus {
    let cached = identity.token_cache().read().await.len();
    DependencyStatus {
        name: "identityProvider".to_string(),
        healthy: true,
        detail: Some(format!(
            "{}, {cached} cached tokens",
            identity.userinfo_url()
        )),
    }
}
