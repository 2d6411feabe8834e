use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use formdesk_core::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Any origin when no frontend is configured, otherwise only that origin.
pub(super) fn build_cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer, AppError> {
    let allow_origin = match frontend_url {
        Some(frontend_url) => AllowOrigin::exact(HeaderValue::from_str(frontend_url).map_err(
            |error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")),
        )?),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE]))
}
