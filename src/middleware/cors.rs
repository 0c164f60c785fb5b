use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The page may be served from anywhere; it only ever sends JSON.
pub fn client_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any)
}
