//! Spiracle access gate.
//!
//! Password-gated front door for the Spiracle chat: a shared-secret login
//! that mints signed cookies, an edge gate on the pages, and rate-limited,
//! validated API routes that forward chat messages to an upstream webhook.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
