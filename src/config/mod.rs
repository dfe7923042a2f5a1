//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (DEMO_PASSWORD, N8N_WEBHOOK_URL, ... overrides)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes afterwards
//! - All fields have defaults to allow minimal configs
//! - A missing secret or webhook URL fails closed at request time, not at load

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, CorsConfig, Environment, GateConfig, ListenerConfig, ObservabilityConfig,
    RateLimitConfig, RatePolicy, SecurityConfig, SharedSecret, TimeoutConfig, WebhookConfig,
};
