//! `POST /api/chat`.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::auth_cookie;
use crate::http::request::request_id;
use crate::http::response::{json_fields, ApiError};
use crate::http::server::AppState;
use crate::security::limits::{validate_message, validate_session_id};
use crate::security::{rate_limit_headers, RouteClass};

/// Forward one authenticated chat message to the webhook.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let decision = state.guard.admit(RouteClass::Chat, &headers);
    if !decision.allowed {
        return Err(ApiError::RateLimited {
            retry_after_secs: decision.reset_in_secs,
            expose_remaining: true,
        });
    }

    if !state.auth.is_authenticated(auth_cookie(&headers)) {
        return Err(ApiError::Unauthorized);
    }

    let fields = json_fields(&body)?;
    let message = validate_message(fields.get("message"))?;
    let session_id = validate_session_id(fields.get("sessionId"))?;

    let reply = state
        .webhook
        .send_message(message, session_id)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %request_id(&headers),
                error = %e,
                "Chat webhook failed"
            );
            ApiError::from(e)
        })?;

    Ok((rate_limit_headers(&decision), Json(reply)).into_response())
}
