//! Boundary guard for the API routes.
//!
//! Combines the CORS policy and the rate limiter. Handlers call
//! [`BoundaryGuard::admit`] before looking at the payload; [`cors_middleware`]
//! wraps every API response, including failures.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::{GateConfig, RatePolicy};
use crate::observability::metrics;
use crate::security::client_ip::client_ip;
use crate::security::cors::CorsPolicy;
use crate::security::rate_limit::{RateLimitDecision, RateLimiter};

pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Route classes with their own rate-limit budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Auth,
    Chat,
}

impl RouteClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteClass::Auth => "auth",
            RouteClass::Chat => "chat",
        }
    }

    /// Rate-limit identifier for a client, e.g. `"chat:203.0.113.7"`.
    pub fn key_for(self, ip: &str) -> String {
        format!("{}:{}", self.as_str(), ip)
    }
}

/// Per-request checks shared by all API handlers.
#[derive(Debug)]
pub struct BoundaryGuard {
    cors: CorsPolicy,
    limiter: Arc<RateLimiter>,
    auth_policy: RatePolicy,
    chat_policy: RatePolicy,
}

impl BoundaryGuard {
    pub fn new(config: &GateConfig, limiter: Arc<RateLimiter>) -> Self {
        Self {
            cors: CorsPolicy::from_config(&config.cors, config.environment),
            limiter,
            auth_policy: config.rate_limit.auth,
            chat_policy: config.rate_limit.chat,
        }
    }

    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    pub fn policy(&self, class: RouteClass) -> RatePolicy {
        match class {
            RouteClass::Auth => self.auth_policy,
            RouteClass::Chat => self.chat_policy,
        }
    }

    /// Count this request against the client's budget for `class`.
    pub fn admit(&self, class: RouteClass, headers: &HeaderMap) -> RateLimitDecision {
        let ip = client_ip(headers);
        let decision = self.limiter.check(&class.key_for(&ip), self.policy(class));

        if !decision.allowed {
            tracing::warn!(
                client = %ip,
                route = class.as_str(),
                reset_in_secs = decision.reset_in_secs,
                "Rate limit exceeded"
            );
            metrics::record_rate_limited(class.as_str());
        }

        decision
    }
}

/// `X-RateLimit-Remaining` / `X-RateLimit-Reset` for an admitted request.
pub fn rate_limit_headers(decision: &RateLimitDecision) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(decision.reset_in_secs));
    headers
}

/// Attach CORS headers to every API response, including errors and preflights.
pub async fn cors_middleware(
    State(guard): State<Arc<BoundaryGuard>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let cors_headers = guard.cors().headers_for(request.headers());
    let mut response = next.run(request).await;
    response.headers_mut().extend(cors_headers);
    response
}
