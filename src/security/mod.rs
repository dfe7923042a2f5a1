//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming API request:
//!     → guard.rs cors_middleware (compute CORS headers for the Origin)
//!     → OPTIONS: 204, done
//!     → client_ip.rs (x-forwarded-for / x-real-ip / "unknown")
//!     → rate_limit.rs (fixed window per "<route>:<ip>")
//!     → limits.rs (payload shape and length ceilings)
//!     → handler
//!     → headers.rs (security headers on every response)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: the edge gate redirects, the handlers decide
//! - Fail closed: reject on any security check failure
//! - No trust in client input beyond the forwarding headers

pub mod client_ip;
pub mod cors;
pub mod guard;
pub mod headers;
pub mod limits;
pub mod rate_limit;

pub use guard::{cors_middleware, rate_limit_headers, BoundaryGuard, RouteClass};
pub use rate_limit::{RateLimitDecision, RateLimitEntry, RateLimiter};
