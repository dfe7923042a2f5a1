//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/auth
//!     → authenticator.rs (constant-time password check)
//!     → token.rs (mint "<issued_at_ms>:<hmac16>")
//!     → cookie.rs (Set-Cookie: spiracle-auth=...)
//!
//! Page request (edge gate):
//!     cookie.rs → token.rs parse_structure + freshness only
//!
//! POST /api/chat:
//!     cookie.rs → authenticator.rs → token.rs verify (HMAC + crypto.rs compare)
//! ```
//!
//! # Design Decisions
//! - Stateless: tokens carry their own issue time and signature
//! - Fail closed: no secret means no logins and no valid tokens
//! - The shared secret is also the signing key

pub mod authenticator;
pub mod cookie;
pub mod crypto;
pub mod token;

pub use authenticator::{AuthError, Authenticator, MAX_PASSWORD_CHARS};
pub use cookie::{auth_cookie, CookieSettings, AUTH_COOKIE_NAME};
pub use crypto::constant_time_eq;
pub use token::{now_ms, parse_structure, Token, TokenCodec, TokenError, TOKEN_TTL_MS};
