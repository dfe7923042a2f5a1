//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Returns every error found,
//! not just the first. A missing secret or webhook URL is not an error here:
//! those fail closed at request time.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{GateConfig, RatePolicy};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("webhook.url is not a valid http(s) URL")]
    WebhookUrl,

    #[error("webhook.timeout_secs must be greater than zero")]
    WebhookTimeout,

    #[error("rate_limit.{0} must have a non-zero window and request budget")]
    RatePolicy(&'static str),

    #[error("rate_limit.sweep_interval_secs must be greater than zero")]
    SweepInterval,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("timeouts.request_secs ({request_secs}) must exceed webhook.timeout_secs ({webhook_secs})")]
    RequestTimeoutBelowWebhook { request_secs: u64, webhook_secs: u64 },

    #[error("security.max_body_size must be greater than zero")]
    BodySize,
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(url) = &config.webhook.url {
        if !is_http_url(url) {
            errors.push(ValidationError::WebhookUrl);
        }
    }

    if config.webhook.timeout_secs == 0 {
        errors.push(ValidationError::WebhookTimeout);
    }

    for (name, policy) in [("auth", &config.rate_limit.auth), ("chat", &config.rate_limit.chat)] {
        if !is_usable_policy(policy) {
            errors.push(ValidationError::RatePolicy(name));
        }
    }

    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::SweepInterval);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    } else if config.timeouts.request_secs <= config.webhook.timeout_secs {
        errors.push(ValidationError::RequestTimeoutBelowWebhook {
            request_secs: config.timeouts.request_secs,
            webhook_secs: config.webhook.timeout_secs,
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::BodySize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

fn is_usable_policy(policy: &RatePolicy) -> bool {
    policy.window_ms > 0 && policy.max_requests > 0
}
