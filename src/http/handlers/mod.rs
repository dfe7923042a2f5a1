//! Route handlers.
//!
//! API handlers take the raw body as `Bytes` so the rate limiter runs before
//! any parsing, and so malformed JSON gets this service's own 400 message.

pub mod auth;
pub mod chat;
pub mod health;
pub mod pages;

use axum::http::StatusCode;

/// CORS preflight. The CORS headers themselves come from `cors_middleware`.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
