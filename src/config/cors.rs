use axum::http::{header, HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Local development origins on the default bind port.
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5000,http://127.0.0.1:5000";

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

pub fn create_cors_layer(configured: Option<&str>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(parse_origins(configured.unwrap_or(DEFAULT_ALLOWED_ORIGINS)))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        // Clients follow Location after a POST to fetch the created item.
        .expose_headers([
            header::LOCATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn parse_origins(origins: &str) -> AllowOrigin {
    let mut allowed = Vec::new();
    for origin in origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if origin == "*" {
            tracing::info!("CORS: wildcard origin configured");
            return AllowOrigin::any();
        }
        match origin.parse::<HeaderValue>() {
            Ok(value) => allowed.push(value),
            Err(e) => tracing::warn!("CORS: skipping invalid origin '{}': {}", origin, e),
        }
    }

    if allowed.is_empty() {
        tracing::warn!("CORS: no usable origins, falling back to defaults");
        return AllowOrigin::list(
            DEFAULT_ALLOWED_ORIGINS
                .split(',')
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        );
    }

    tracing::debug!("CORS: {} allowed origin(s)", allowed.len());
    AllowOrigin::list(allowed)
}
