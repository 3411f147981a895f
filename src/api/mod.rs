//! API Module
//!
//! HTTP handlers and routing for the inventory REST API.
//!
//! # Endpoints
//! - `/api/products` - Product CRUD, listing, low stock and stock updates
//! - `/api/categories` - Category CRUD
//! - `/api/dashboard` - Aggregated statistics and sample data seeding
//! - `/health`, `/health/live`, `/health/ready` - Probes

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{create_router, CORRELATION_ID};
pub use state::AppState;
