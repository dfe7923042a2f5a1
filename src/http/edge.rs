//! Edge gate for page routes.
//!
//! A loose, secret-free check: the cookie must look like a token and be
//! younger than the TTL. Forged tokens that pass here still fail the API's
//! full verification.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{auth_cookie, now_ms, parse_structure};
use crate::observability::metrics;

pub const LOGIN_PATH: &str = "/";
pub const CHAT_PATH: &str = "/chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDecision {
    Pass,
    RedirectToLogin,
    RedirectToChat,
}

/// `/chat` and everything below it.
pub fn is_protected(path: &str) -> bool {
    path == CHAT_PATH
        || path
            .strip_prefix(CHAT_PATH)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn decide(path: &str, cookie: Option<&str>, now_ms: u64) -> EdgeDecision {
    let has_auth = cookie
        .and_then(|raw| parse_structure(raw).ok())
        .is_some_and(|token| token.is_fresh_at(now_ms));

    if is_protected(path) && !has_auth {
        EdgeDecision::RedirectToLogin
    } else if path == LOGIN_PATH && has_auth {
        EdgeDecision::RedirectToChat
    } else {
        EdgeDecision::Pass
    }
}

/// Middleware applying [`decide`] to page requests.
pub async fn edge_gate(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path();
    let decision = decide(path, auth_cookie(request.headers()), now_ms());

    match decision {
        EdgeDecision::Pass => next.run(request).await,
        EdgeDecision::RedirectToLogin => {
            tracing::debug!(path = %path, "Edge gate: redirecting to login");
            metrics::record_edge_redirect("login");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        EdgeDecision::RedirectToChat => {
            tracing::debug!(path = %path, "Edge gate: already signed in");
            metrics::record_edge_redirect("chat");
            Redirect::temporary(CHAT_PATH).into_response()
        }
    }
}
