//! Per-request CORS decision for the API routes.
//!
//! Disallowed origins get no CORS headers at all; the browser blocks them.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::{CorsConfig, Environment};

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";
const DEV_ORIGIN: &str = "http://localhost:3000";

/// Origin allow-list plus trusted suffixes.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
    trusted_suffixes: Vec<String>,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig, environment: Environment) -> Self {
        let mut allowed_origins = config.allowed_origins.clone();
        if environment == Environment::Development && !allowed_origins.iter().any(|o| o == DEV_ORIGIN) {
            allowed_origins.push(DEV_ORIGIN.to_string());
        }

        Self {
            allowed_origins,
            trusted_suffixes: config.trusted_suffixes.clone(),
            max_age: HeaderValue::from(config.max_age_secs),
        }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
            || self
                .trusted_suffixes
                .iter()
                .any(|suffix| !suffix.is_empty() && origin.ends_with(suffix.as_str()))
    }

    /// CORS response headers for a request, empty when the origin is not trusted.
    pub fn headers_for(&self, request_headers: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let origin = match request_headers.get(header::ORIGIN) {
            Some(origin) => origin,
            None => return headers,
        };
        let trusted = origin.to_str().map(|o| self.is_allowed(o)).unwrap_or(false);
        if !trusted {
            return headers;
        }

        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        headers
    }
}
