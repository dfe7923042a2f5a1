//! `POST /api/auth` and `POST /api/logout`.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::request::request_id;
use crate::http::response::{json_fields, ApiError, LoginFailure};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::client_ip::client_ip;
use crate::security::limits::validate_password;
use crate::security::{rate_limit_headers, RouteClass};

/// Exchange the shared password for an auth cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, LoginFailure> {
    let decision = state.guard.admit(RouteClass::Auth, &headers);
    if !decision.allowed {
        metrics::record_login("rate_limited");
        return Err(ApiError::RateLimited {
            retry_after_secs: decision.reset_in_secs,
            expose_remaining: false,
        }
        .into());
    }

    let fields = json_fields(&body)?;
    let password = validate_password(fields.get("password"))?;

    if !state.auth.check_password(password) {
        tracing::warn!(
            request_id = %request_id(&headers),
            client = %client_ip(&headers),
            "Login rejected"
        );
        metrics::record_login("invalid");
        return Err(ApiError::InvalidPassword.into());
    }

    let token = state.auth.issue_token().map_err(|e| {
        tracing::error!(error = %e, "Could not issue token");
        ApiError::Misconfigured
    })?;

    metrics::record_login("success");
    tracing::info!(request_id = %request_id(&headers), "Login succeeded");

    Ok((
        [(header::SET_COOKIE, state.cookies.issue(&token))],
        rate_limit_headers(&decision),
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// Drop the auth cookie. Tokens are stateless, so there is nothing to revoke.
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, state.cookies.clear())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
