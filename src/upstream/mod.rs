//! Upstream collaborators.
//!
//! # Data Flow
//! ```text
//! Validated chat request
//!     → webhook.rs (POST JSON, 60s deadline)
//!     → {response, sessionId} | {error} | timeout | non-2xx
//!     → handler maps failures to a generic retry message
//! ```
//!
//! # Design Decisions
//! - Every call has a deadline
//! - No retries: chat messages are not idempotent
//! - Upstream error details are logged, never returned to the client

pub mod webhook;

pub use webhook::{WebhookClient, WebhookError, WebhookReply};
