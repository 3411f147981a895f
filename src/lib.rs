//! Inventory API - product and category management over a document store
//!
//! REST service with paginated product search, dashboard aggregation and a
//! read-through category cache.

pub mod api;
pub mod application;
pub mod auth;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::spawn_cleanup_task;
