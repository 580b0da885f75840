//! CORS configuration.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::errors::ConfigError;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is not set.
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Create the CORS layer for the given origins. A single `*` allows any origin.
pub fn create_cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    if origins.iter().any(|origin| origin == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ConfigError::invalid("CORS_ALLOWED_ORIGINS", origin.as_str()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer.allow_origin(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins_are_valid() {
        let origins: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect();
        assert!(create_cors_layer(&origins).is_ok());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let err = create_cors_layer(&["http://bad\norigin".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "CORS_ALLOWED_ORIGINS", .. }));
    }

    #[test]
    fn test_wildcard_is_accepted() {
        assert!(create_cors_layer(&["*".to_string()]).is_ok());
    }
}
