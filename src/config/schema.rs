//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration for the gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Deployment environment (affects cookie and CORS defaults).
    pub environment: Environment,

    /// Shared-secret authentication.
    pub auth: AuthConfig,

    /// Upstream chat webhook.
    pub webhook: WebhookConfig,

    /// Per-route rate limiting policies.
    pub rate_limit: RateLimitConfig,

    /// Cross-origin policy for the API routes.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Parse the values accepted in `SPIRACLE_ENV` / `NODE_ENV`.
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" => Some(Environment::Development),
            _ => None,
        }
    }
}

/// The shared secret gating access. Its `Debug` output never shows the value.
///
/// Only constructed through [`SharedSecret::new`], so it is never empty.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wrap a secret value. Empty values count as unconfigured.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared password; doubles as the token signing key.
    #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
    pub shared_secret: Option<SharedSecret>,
}

/// An empty `shared_secret` in the file is the same as leaving it out.
fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SharedSecret>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(SharedSecret::new))
}

/// Upstream webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook URL. Chat requests fail closed when unset.
    pub url: Option<String>,

    /// Total time allowed for a webhook round trip, in seconds.
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 60,
        }
    }
}

/// A fixed-window rate limit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RatePolicy {
    /// Window length in milliseconds.
    pub window_ms: u64,

    /// Requests admitted per window.
    pub max_requests: u32,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Policy for login attempts.
    pub auth: RatePolicy,

    /// Policy for chat messages.
    pub chat: RatePolicy,

    /// How often expired entries are swept, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth: RatePolicy {
                window_ms: 60_000,
                max_requests: 5,
            },
            chat: RatePolicy {
                window_ms: 60_000,
                max_requests: 20,
            },
            sweep_interval_secs: 60,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins echoed back verbatim.
    pub allowed_origins: Vec<String>,

    /// Origins ending in one of these suffixes are also trusted.
    pub trusted_suffixes: Vec<String>,

    /// Preflight cache duration in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://spiracle-chat.vercel.app".to_string(),
                "https://spiracle-chat-quentin-ellis-projects.vercel.app".to_string(),
            ],
            trusted_suffixes: vec![".vercel.app".to_string()],
            max_age_secs: 86_400,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must exceed the webhook timeout.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 75 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_policies() {
        let config = GateConfig::default();
        assert_eq!(config.rate_limit.auth, RatePolicy { window_ms: 60_000, max_requests: 5 });
        assert_eq!(config.rate_limit.chat, RatePolicy { window_ms: 60_000, max_requests: 20 });
        assert_eq!(config.webhook.timeout_secs, 60);
        assert!(config.auth.shared_secret.is_none());
        assert!(config.environment.is_production());
    }

    #[test]
    fn test_secret_is_redacted() {
        let secret = SharedSecret::new("hunter2").unwrap();
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("hunter2"));

        let mut config = GateConfig::default();
        config.auth.shared_secret = Some(secret);
        assert!(!format!("{:?}", config).contains("hunter2"));
        assert!(!toml::to_string(&config).unwrap().contains("hunter2"));
    }

    #[test]
    fn test_empty_secret_is_unconfigured() {
        assert!(SharedSecret::new("").is_none());

        let config: GateConfig = toml::from_str("[auth]\nshared_secret = \"\"").unwrap();
        assert!(config.auth.shared_secret.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: GateConfig = toml::from_str(
            r#"
            environment = "development"

            [auth]
            shared_secret = "open-sesame"

            [rate_limit.chat]
            window_ms = 1000
            max_requests = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.auth.shared_secret.unwrap().expose(), b"open-sesame");
        assert_eq!(config.rate_limit.chat.max_requests, 2);
        assert_eq!(config.rate_limit.auth.max_requests, 5);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }
}
