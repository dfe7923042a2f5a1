//! Security response headers.
//!
//! Applied to every response by `SetResponseHeaderLayer`s at the outermost
//! layer of the router, so error, redirect and timeout responses carry them too.

use axum::http::{header, HeaderName, HeaderValue};

/// Headers stamped on every response.
pub fn security_headers() -> [(HeaderName, HeaderValue); 5] {
    [
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
        (
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
        (
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ),
    ]
}
