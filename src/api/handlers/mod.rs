//! API Handlers
//!
//! Thin adapters: extract, send to the [`Inventory`](crate::application::Inventory),
//! wrap the result in the response envelope.

pub mod categories;
pub mod dashboard;
pub mod health;
pub mod products;

use axum::http::{header::LOCATION, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::ApiResponse;

/// 201 response with a `Location` header pointing at the new resource.
fn created<T: Serialize>(location: String, data: T, message: &str) -> Response {
    let mut response = (StatusCode::CREATED, Json(ApiResponse::ok(data, message))).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}
