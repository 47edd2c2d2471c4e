// CORS layer for browser clients
use axum::http::{header, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Any origin is accepted; it is echoed back because credentials are allowed
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}
