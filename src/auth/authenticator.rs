//! Authoritative authentication checks for API handlers.
//!
//! The edge gate's structural check is only good for redirects; anything
//! that touches the webhook goes through [`Authenticator::is_authenticated`].

use crate::auth::crypto::constant_time_eq;
use crate::auth::token::{now_ms, Token, TokenCodec};
use crate::config::SharedSecret;

/// Passwords longer than this are rejected without comparison.
pub const MAX_PASSWORD_CHARS: usize = 100;

/// Errors raised while issuing credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("shared secret is not configured")]
    NotConfigured,
}

/// Password check and token verification with the shared secret.
///
/// Without a configured secret every check fails closed.
#[derive(Debug, Clone)]
pub struct Authenticator {
    secret: Option<SharedSecret>,
    codec: Option<TokenCodec>,
}

impl Authenticator {
    pub fn new(secret: Option<SharedSecret>) -> Self {
        let codec = secret.clone().map(TokenCodec::new);
        Self { secret, codec }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Compare a candidate password against the shared secret in constant time.
    pub fn check_password(&self, candidate: &str) -> bool {
        let secret = match &self.secret {
            Some(secret) => secret,
            None => {
                tracing::error!("Shared secret not configured; denying login");
                return false;
            }
        };

        if candidate.chars().count() > MAX_PASSWORD_CHARS {
            return false;
        }

        constant_time_eq(candidate.as_bytes(), secret.expose())
    }

    /// Mint a fresh token for a caller that just passed [`check_password`](Self::check_password).
    pub fn issue_token(&self) -> Result<Token, AuthError> {
        self.codec
            .as_ref()
            .map(TokenCodec::mint)
            .ok_or(AuthError::NotConfigured)
    }

    /// Full verification of a cookie value against the current time.
    pub fn is_authenticated(&self, token: Option<&str>) -> bool {
        self.is_authenticated_at(token, now_ms())
    }

    pub fn is_authenticated_at(&self, token: Option<&str>, now_ms: u64) -> bool {
        match (token, &self.codec) {
            (Some(raw), Some(codec)) => codec.verify_at(raw, now_ms),
            _ => false,
        }
    }
}
