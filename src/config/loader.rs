//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{Environment, GateConfig, SharedSecret};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the shared secret.
pub const ENV_SHARED_SECRET: &str = "DEMO_PASSWORD";
/// Environment variable holding the webhook URL.
pub const ENV_WEBHOOK_URL: &str = "N8N_WEBHOOK_URL";
/// Environment variables selecting the deployment environment, in priority order.
pub const ENV_ENVIRONMENT: [&str; 2] = ["SPIRACLE_ENV", "NODE_ENV"];
/// Environment variable overriding the bind address.
pub const ENV_BIND_ADDRESS: &str = "SPIRACLE_BIND";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the process configuration: optional file, then environment overrides,
/// then validation. Called once at startup.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GateConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to resolve variables.
pub fn apply_env_overrides<F>(config: &mut GateConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup(ENV_SHARED_SECRET).and_then(SharedSecret::new) {
        config.auth.shared_secret = Some(secret);
    }

    if let Some(url) = lookup(ENV_WEBHOOK_URL).filter(|v| !v.trim().is_empty()) {
        config.webhook.url = Some(url.trim().to_string());
    }

    if let Some(environment) = ENV_ENVIRONMENT
        .iter()
        .find_map(|key| lookup(key).and_then(|v| Environment::from_env_value(&v)))
    {
        config.environment = environment;
    }

    if let Some(bind) = lookup(ENV_BIND_ADDRESS).filter(|v| !v.trim().is_empty()) {
        config.listener.bind_address = bind.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GateConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[
                ("DEMO_PASSWORD", "open-sesame"),
                ("N8N_WEBHOOK_URL", " https://hooks.example.com/chat "),
                ("NODE_ENV", "development"),
                ("SPIRACLE_BIND", "127.0.0.1:4000"),
            ]),
        );

        assert_eq!(config.auth.shared_secret.unwrap().expose(), b"open-sesame");
        assert_eq!(config.webhook.url.as_deref(), Some("https://hooks.example.com/chat"));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
    }

    #[test]
    fn test_spiracle_env_beats_node_env() {
        let mut config = GateConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[("SPIRACLE_ENV", "production"), ("NODE_ENV", "development")]),
        );
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn test_empty_values_leave_config_untouched() {
        let mut config = GateConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[("DEMO_PASSWORD", ""), ("N8N_WEBHOOK_URL", "  ")]),
        );
        assert!(config.auth.shared_secret.is_none());
        assert!(config.webhook.url.is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = read_config_file(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
