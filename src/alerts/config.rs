//! VictorOps notifier configuration

use serde::{Deserialize, Serialize};

use super::notifier::VictorOpsError;

/// Default VictorOps REST endpoint for generic alert integrations
pub const DEFAULT_URL: &str = "https://alert.victorops.com/integrations/generic/20131114/alert";

/// Notifier configuration, as produced by the config loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Whether alerts are delivered at all
    pub enabled: bool,
    /// Routing key used when an alert does not name one
    pub routing_key: String,
    /// Receiver base URL
    pub url: String,
    /// Account API key, appended to the base URL
    pub api_key: String,
    /// Send every alert here regardless of per-rule opt-in
    pub global: bool,
}

impl Config {
    /// Create an enabled config for the given API key and routing key
    pub fn new(api_key: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            routing_key: routing_key.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Set the receiver base URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the global flag
    pub fn with_global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    /// Set enabled state
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// URL that routing keys are appended to: `<url>/<api_key>/`
    pub fn effective_url(&self) -> String {
        format!("{}/{}/", self.url, self.api_key)
    }

    /// Check that an enabled config points at a usable URL
    pub fn validate(&self) -> Result<(), VictorOpsError> {
        if !self.enabled {
            return Ok(());
        }
        reqwest::Url::parse(&self.url)
            .map_err(|e| VictorOpsError::InvalidConfig(format!("invalid url {:?}: {}", self.url, e)))?;
        Ok(())
    }

    /// Create a config from environment variables
    /// VICTOROPS_ENABLED=true
    /// VICTOROPS_API_KEY=xxxx
    /// VICTOROPS_ROUTING_KEY=ops
    /// VICTOROPS_URL=https://alert.victorops.com/integrations/generic/20131114/alert
    /// VICTOROPS_GLOBAL=false
    pub fn from_env() -> Self {
        let flag = |name: &str| {
            std::env::var(name)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false)
        };

        Self {
            enabled: flag("VICTOROPS_ENABLED"),
            routing_key: std::env::var("VICTOROPS_ROUTING_KEY").unwrap_or_default(),
            url: std::env::var("VICTOROPS_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            api_key: std::env::var("VICTOROPS_API_KEY").unwrap_or_default(),
            global: flag("VICTOROPS_GLOBAL"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: false,
            routing_key: String::new(),
            url: DEFAULT_URL.to_string(),
            api_key: String::new(),
            global: false,
        }
    }
}
