//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout, security headers)
//!     → page routes:  edge.rs (cookie shape + freshness) → handlers/pages.rs
//!     → API routes:   security::guard (CORS, rate limit) → handlers/{auth,chat}.rs
//!     → response.rs (error mapping)
//!     → Send to client
//! ```

pub mod edge;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use edge::{decide, EdgeDecision};
pub use request::{request_id, X_REQUEST_ID};
pub use response::{ApiError, LoginFailure};
pub use server::{AppState, HttpServer};
