use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Browser clients send the bearer token in `Authorization`; any origin is
/// allowed since no cookies are involved.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any)
}
