//! Response DTOs for the inventory API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ValidationErrors;

/// Success envelope: `{ "success": true, "data": ..., "message": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope without a `data` field.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
        }
    }
}

/// Error envelope: `{ "success": false, "message": ..., "errors": {...}? }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: ValidationErrors) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Some(errors),
        }
    }
}

// == Health ==
/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
}

impl HealthResponse {
    pub fn healthy(uptime_seconds: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
        }
    }
}

/// Response body for `GET /health/live`.
#[derive(Debug, Clone, Serialize)]
pub struct LivenessResponse {
    pub alive: bool,
    pub timestamp: DateTime<Utc>,
}

impl LivenessResponse {
    pub fn alive() -> Self {
        Self {
            alive: true,
            timestamp: Utc::now(),
        }
    }
}

/// State of one dependency in a readiness report.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Response body for `GET /health/ready`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub timestamp: DateTime<Utc>,
    pub dependencies: Vec<DependencyStatus>,
}

impl ReadinessResponse {
    pub fn new(dependencies: Vec<DependencyStatus>) -> Self {
        Self {
            ready: dependencies.iter().all(|d| d.healthy),
            timestamp: Utc::now(),
            dependencies,
        }
    }
}

/// Response body for `GET /health/detailed`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    /// `healthy`, or `degraded` when any check fails
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub checks: Vec<DependencyStatus>,
}

impl DetailedHealthResponse {
    pub fn new(uptime_seconds: u64, checks: Vec<DependencyStatus>) -> Self {
        let status = if checks.iter().all(|c| c.healthy) {
            "healthy"
        } else {
            "degraded"
        };
        Self {
            status: status.to_string(),
            timestamp: Utc::now(),
            uptime_seconds,
            checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_serialize() {
        let json = serde_json::to_value(ApiResponse::ok(5, "Done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5, "message": "Done"}));
    }

    #[test]
    fn test_message_only_response_omits_data() {
        let json = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_readiness_requires_all_dependencies() {
        let ready = ReadinessResponse::new(vec![
            DependencyStatus {
                name: "products".to_string(),
                healthy: true,
                detail: None,
            },
            DependencyStatus {
                name: "categories".to_string(),
                healthy: false,
                detail: Some("unreachable".to_string()),
            },
        ]);
        assert!(!ready.ready);
    }

    #[test]
    fn test_detailed_health_degrades_on_failed_check() {
        let check = |healthy| DependencyStatus {
            name: "disk".to_string(),
            healthy,
            detail: None,
        };
        assert_eq!(DetailedHealthResponse::new(5, vec![check(true)]).status, "healthy");

        let report = DetailedHealthResponse::new(5, vec![check(true), check(false)]);
        assert_eq!(report.status, "degraded");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["uptimeSeconds"], 5);
        assert_eq!(json["checks"].as_array().unwrap().len(), 2);
    }
}
