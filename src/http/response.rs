//! API error responses.
//!
//! # Responsibilities
//! - Map every failure a handler can hit to a status code and a client-safe message
//! - Render `{error}` for chat, `{success: false, error}` for login
//! - Carry `Retry-After` / `X-RateLimit-Remaining` on 429s
//!
//! # Design Decisions
//! - Upstream and configuration failures share one generic message
//! - The underlying cause is logged where it happens, never rendered

use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::security::guard::X_RATELIMIT_REMAINING;
use crate::security::limits::InputError;
use crate::upstream::WebhookError;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const UPSTREAM_TIMEOUT: &str = "The Librarian is taking a while to think. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Invalid(#[from] InputError),

    #[error("Invalid request body")]
    MalformedBody,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Unauthorised")]
    Unauthorized,

    #[error("Too many requests. Please try again later.")]
    RateLimited {
        retry_after_secs: u64,
        expose_remaining: bool,
    },

    #[error("Something went wrong. Please try again.")]
    Misconfigured,

    #[error("The Librarian is taking a while to think. Please try again.")]
    UpstreamTimeout,

    #[error("Something went wrong. Please try again.")]
    Upstream,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Invalid(_) | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::InvalidPassword | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Misconfigured | ApiError::UpstreamTimeout | ApiError::Upstream => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn render(self, body: Value) -> Response {
        let mut response = (self.status(), Json(body)).into_response();
        if let ApiError::RateLimited {
            retry_after_secs,
            expose_remaining,
        } = self
        {
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            if expose_remaining {
                headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
            }
        }
        response
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::NotConfigured => ApiError::Misconfigured,
            WebhookError::Timeout(_) => ApiError::UpstreamTimeout,
            _ => ApiError::Upstream,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        self.render(body)
    }
}

/// A failed login, rendered as `{success: false, error}`.
#[derive(Debug)]
pub struct LoginFailure(pub ApiError);

impl From<ApiError> for LoginFailure {
    fn from(err: ApiError) -> Self {
        LoginFailure(err)
    }
}

impl From<InputError> for LoginFailure {
    fn from(err: InputError) -> Self {
        LoginFailure(ApiError::Invalid(err))
    }
}

impl IntoResponse for LoginFailure {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "error": self.0.to_string() });
        self.0.render(body)
    }
}

/// Parse a request body as JSON. Any well-formed value is accepted; field
/// lookups on a non-object simply find nothing.
pub fn json_fields(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::MalformedBody)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(InputError::MessageEmpty).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Upstream.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_webhook_errors_are_generic() {
        let timeout = ApiError::from(WebhookError::Timeout(Duration::from_secs(60)));
        assert_eq!(timeout.to_string(), UPSTREAM_TIMEOUT);

        let failed = ApiError::from(WebhookError::Upstream("workflow crashed".into()));
        assert_eq!(failed.to_string(), GENERIC_FAILURE);

        let missing = ApiError::from(WebhookError::NotConfigured);
        assert_eq!(missing.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_rate_limited_headers() {
        let response = ApiError::RateLimited {
            retry_after_secs: 42,
            expose_remaining: true,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
        assert_eq!(response.headers()[X_RATELIMIT_REMAINING], "0");

        let login = LoginFailure(ApiError::RateLimited {
            retry_after_secs: 7,
            expose_remaining: false,
        })
        .into_response();
        assert_eq!(login.headers()[header::RETRY_AFTER], "7");
        assert!(login.headers().get(X_RATELIMIT_REMAINING).is_none());
    }

    #[test]
    fn test_json_fields() {
        let value = json_fields(&Bytes::from_static(br#"{"password":"x"}"#)).unwrap();
        assert_eq!(value["password"], "x");

        let array = json_fields(&Bytes::from_static(b"[1,2]")).unwrap();
        assert!(array.get("password").is_none());

        assert!(matches!(
            json_fields(&Bytes::from_static(b"not json")),
            Err(ApiError::MalformedBody)
        ));
    }
}
