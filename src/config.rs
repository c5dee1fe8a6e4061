//! # Configuration
//!
//! TOML configuration for the notifier binary. `${VAR}` and
//! `${VAR:-default}` placeholders are replaced from the environment before
//! parsing, so secrets and hosts can stay out of the file.
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com"
//! feed_path = "/orders/updates"
//! request_timeout_secs = 10
//!
//! [notifier]
//! interval_minutes = 1
//! check_delay_ms = 1000
//! clear_token_on_unauthorized = true
//!
//! [session]
//! token_path = "session.jwt"
//! ```

use crate::notifier::MAX_INTERVAL;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error that occurs during file I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error that occurs when parsing TOML configuration.
    #[error("Configuration error: {0}")]
    Parse(String),
    /// Error that occurs when configuration validation fails.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.message().to_string())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub notifier: PollingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the order feed lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_feed_path")]
    pub feed_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Timer and tick behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Delay between a finished order action and the follow-up check.
    #[serde(default = "default_check_delay_ms")]
    pub check_delay_ms: u64,
    #[serde(default = "default_true")]
    pub clear_token_on_unauthorized: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            check_delay_ms: default_check_delay_ms(),
            clear_token_on_unauthorized: true,
        }
    }
}

/// Session token storage. Without `token_path` the token only lives in memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub token_path: Option<PathBuf>,
}

fn default_feed_path() -> String {
    "/orders/updates".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_interval_minutes() -> u64 {
    1
}

fn default_check_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl NotifierConfig {
    /// Loads configuration from a file, resolving environment placeholders.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        content.parse()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.notifier.interval_minutes.saturating_mul(60))
    }

    pub fn check_delay(&self) -> Duration {
        Duration::from_millis(self.notifier.check_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation("api.base_url cannot be empty".into()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        if !self.api.feed_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "api.feed_path must start with '/', got '{}'",
                self.api.feed_path
            )));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.notifier.interval_minutes == 0 {
            return Err(ConfigError::Validation(
                "notifier.interval_minutes must be greater than zero".into(),
            ));
        }
        let max_minutes = MAX_INTERVAL.as_secs() / 60;
        if self.notifier.interval_minutes > max_minutes {
            return Err(ConfigError::Validation(format!(
                "notifier.interval_minutes must be at most {}, got {}",
                max_minutes, self.notifier.interval_minutes
            )));
        }
        Ok(())
    }
}

impl FromStr for NotifierConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let resolved = resolve_env_vars(s)?;
        let config: NotifierConfig = toml::from_str(&resolved)?;
        config.validate()?;
        Ok(config)
    }
}

/// Replaces `${VAR}` / `${VAR:-default}` with environment values.
fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
        .map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

    let mut missing = None;
    let resolved = re.replace_all(input, |cap: &regex::Captures| {
        let var_name = &cap[1];
        match (std::env::var(var_name), cap.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var_name) => Err(ConfigError::Validation(format!(
            "Environment variable '{}' not found",
            var_name
        ))),
        None => Ok(resolved.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: NotifierConfig = r#"
            [api]
            base_url = "https://api.example.com"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.api.feed_path, "/orders/updates");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.check_delay(), Duration::from_millis(1000));
        assert!(config.notifier.clear_token_on_unauthorized);
        assert!(config.session.token_path.is_none());
    }

    #[test]
    fn env_placeholders_are_resolved() {
        std::env::set_var("ORDER_NOTIFIER_TEST_HOST", "orders.internal:8080");
        let config: NotifierConfig = r#"
            [api]
            base_url = "http://${ORDER_NOTIFIER_TEST_HOST}"
            feed_path = "${ORDER_NOTIFIER_TEST_PATH:-/orders/updates}"
        "#
        .parse()
        .unwrap();
        std::env::remove_var("ORDER_NOTIFIER_TEST_HOST");

        assert_eq!(config.api.base_url, "http://orders.internal:8080");
        assert_eq!(config.api.feed_path, "/orders/updates");
    }

    #[test]
    fn missing_env_var_is_reported() {
        let err = r#"
            [api]
            base_url = "${ORDER_NOTIFIER_TEST_UNSET_VAR}"
        "#
        .parse::<NotifierConfig>()
        .unwrap_err();
        assert!(err.to_string().contains("ORDER_NOTIFIER_TEST_UNSET_VAR"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = r#"
            [api]
            base_url = "https://api.example.com"

            [notifier]
            interval_minutes = 0
        "#
        .parse::<NotifierConfig>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn oversized_interval_is_rejected() {
        let config: NotifierConfig = r#"
            [api]
            base_url = "https://api.example.com"

            [notifier]
            interval_minutes = 1440
        "#
        .parse()
        .unwrap();
        assert_eq!(config.interval(), MAX_INTERVAL);

        let err = r#"
            [api]
            base_url = "https://api.example.com"

            [notifier]
            interval_minutes = 307445734561825860
        "#
        .parse::<NotifierConfig>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn base_url_must_be_http() {
        let err = r#"
            [api]
            base_url = "ftp://api.example.com"
        "#
        .parse::<NotifierConfig>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
            [api]
            base_url = "https://api.example.com"

            [notifier]
            interval_minutes = 5

            [session]
            token_path = "/var/lib/order-notifier/session.jwt"
            "#,
        )
        .await
        .unwrap();

        let config = NotifierConfig::from_file(&path).await.unwrap();
        assert_eq!(config.interval(), Duration::from_secs(300));
        assert_eq!(
            config.session.token_path.as_deref(),
            Some(Path::new("/var/lib/order-notifier/session.jwt"))
        );
    }
}
