//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Bind listener → Serve + spawn sweeper
//!
//! Shutdown (shutdown.rs):
//!     Signal received → trigger → server drains, sweeper exits → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then observability, then listeners
//! - Background tasks take a shutdown receiver; none are free-running

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
