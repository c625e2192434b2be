//! Client configuration.
//!
//! The core consumes three values: the instance base URL, the bot token and
//! an optional log filter. They can be supplied programmatically or read
//! from the environment (`DECENTRA_INSTANCE_URL`, `DECENTRA_BOT_TOKEN`,
//! `DECENTRA_LOG`).

use crate::error::ConfigError;

/// Configuration for a [`crate::Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Decentra instance, without trailing slash.
    pub instance_url: String,
    /// Bot token used for both the WebSocket handshake and REST calls.
    pub token: String,
    /// Optional `tracing` filter directive (e.g. `info`, `decentra=debug`).
    pub log_filter: Option<String>,
}

impl ClientConfig {
    /// Creates a validated configuration.
    pub fn new(
        instance_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            log_filter: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let instance_url = std::env::var("DECENTRA_INSTANCE_URL").unwrap_or_default();
        let token = std::env::var("DECENTRA_BOT_TOKEN").unwrap_or_default();
        let mut config = Self::new(instance_url, token)?;
        config.log_filter = std::env::var("DECENTRA_LOG").ok().filter(|v| !v.is_empty());
        Ok(config)
    }

    /// Sets the log filter directive.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_url.is_empty() {
            return Err(ConfigError::MissingInstanceUrl);
        }
        if !self.instance_url.starts_with("http://") && !self.instance_url.starts_with("https://") {
            return Err(ConfigError::InvalidInstanceUrl(self.instance_url.clone()));
        }
        if self.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(())
    }

    /// The WebSocket endpoint derived from the instance URL.
    pub fn ws_url(&self) -> String {
        let base = if let Some(rest) = self.instance_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.instance_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.instance_url.clone()
        };
        format!("{base}/ws")
    }

    /// Joins an API path onto the instance URL.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.instance_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_and_derives_urls() {
        let config = ClientConfig::new("https://chat.example.org/", "tok").unwrap();
        assert_eq!(config.instance_url, "https://chat.example.org");
        assert_eq!(config.ws_url(), "wss://chat.example.org/ws");
        assert_eq!(
            config.api_url("/api/bot/messages"),
            "https://chat.example.org/api/bot/messages"
        );
    }

    #[test]
    fn plain_http_maps_to_ws() {
        let config = ClientConfig::new("http://localhost:8065", "tok").unwrap();
        assert_eq!(config.ws_url(), "ws://localhost:8065/ws");
    }

    #[test]
    fn missing_values_are_rejected() {
        assert!(matches!(
            ClientConfig::new("", "tok"),
            Err(ConfigError::MissingInstanceUrl)
        ));
        assert!(matches!(
            ClientConfig::new("https://chat.example.org", ""),
            Err(ConfigError::MissingToken)
        ));
        assert!(matches!(
            ClientConfig::new("chat.example.org", "tok"),
            Err(ConfigError::InvalidInstanceUrl(_))
        ));
    }
}
