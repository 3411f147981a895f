//! Request and Response models for the inventory API
//!
//! This module defines the HTTP-facing shapes that are not handler requests
//! themselves: query strings, the response envelope and health payloads.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{LowStockParams, ProductListParams, StockUpdateRequest};
pub use responses::{
    ApiResponse, DependencyStatus, DetailedHealthResponse, ErrorResponse, HealthResponse,
    LivenessResponse, ReadinessResponse,
};
