//! API Routes
//!
//! Configures the Axum router with all inventory endpoints and middleware.

use axum::{
    extract::Request,
    http::{
        header::{REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION},
        HeaderName, HeaderValue,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info_span;

use super::handlers::{categories, dashboard, health, products};
use super::AppState;
use crate::auth::require_auth;

/// Header carrying the per-request correlation id.
pub const CORRELATION_ID: &str = "x-correlation-id";

/// Creates the main router with all endpoints configured.
///
/// # Middleware (outermost first)
/// - Correlation id: reuses the client's `X-Correlation-Id` or generates a UUID
/// - Tracing: one span per request carrying the correlation id
/// - Correlation id echoed on the response
/// - CORS: allows any origin
/// - Security headers added unless the handler set them
///
/// `/api` routes require a bearer token when an identity provider is configured.
pub fn create_router(state: AppState) -> Router {
    let correlation_header = HeaderName::from_static(CORRELATION_ID);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([correlation_header.clone()]);

    let mut api = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/low-stock", get(products::low_stock_products))
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/:id/stock", patch(products::update_stock))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/dashboard/stats", get(dashboard::dashboard_stats))
        .route("/dashboard/seed", post(dashboard::seed_sample_data));

    if let Some(identity) = state.identity.clone() {
        api = api.route_layer(middleware::from_fn_with_state(identity, require_auth));
    }

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/health/detailed", get(health::detailed))
        .nest("/api", api)
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(cors)
        .layer(PropagateRequestIdLayer::new(correlation_header.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let correlation_id = request
                .headers()
                .get(CORRELATION_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                correlation_id,
            )
        }))
        .layer(SetRequestIdLayer::new(correlation_header, MakeRequestUuid))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::in_memory(&Config::default()).unwrap();
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_correlation_id_is_generated() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers().get(CORRELATION_ID).unwrap();
        assert_eq!(id.to_str().unwrap().len(), 36);
    }

    #[tokio::test]
    async fn test_correlation_id_is_echoed() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .header("x-correlation-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-correlation-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_security_headers() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/api/categories").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-xss-protection"], "1; mode=block");
        assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/api/products/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
