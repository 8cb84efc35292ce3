//! VictorOps notifier
//!
//! Holds the receiver configuration behind a single reader/writer lock and
//! delivers each alert as one synchronous POST. There is no retry: every
//! failure is classified and returned to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::client::{HttpClient, HttpResponse};
use super::config::Config;
use super::payload::AlertPayload;

/// Message type used by service tests
pub const TEST_MESSAGE_TYPE: &str = "CRITICAL";
/// Message used by service tests
pub const TEST_MESSAGE: &str = "test victorops message";
/// Entity ID used by service tests
pub const TEST_ENTITY_ID: &str = "testEntityID";

/// Configuration snapshot; always replaced as a whole
#[derive(Debug, Clone)]
struct NotifierState {
    enabled: bool,
    routing_key: String,
    /// Base URL with the API key, ready for a routing key suffix
    url: String,
    global: bool,
}

impl From<&Config> for NotifierState {
    fn from(config: &Config) -> Self {
        Self {
            enabled: config.enabled,
            routing_key: config.routing_key.clone(),
            url: config.effective_url(),
            global: config.global,
        }
    }
}

/// Options for a connectivity test without a real alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestOptions {
    pub routing_key: String,
    pub message_type: String,
    pub message: String,
    #[serde(rename = "entityID")]
    pub entity_id: String,
}

/// Error body returned by VictorOps
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Forwards alerts to the VictorOps REST endpoint
pub struct VictorOpsNotifier {
    state: RwLock<NotifierState>,
    client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for VictorOpsNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("VictorOpsNotifier")
            .field("enabled", &state.enabled)
            .field("routing_key", &state.routing_key)
            .field("global", &state.global)
            .finish()
    }
}

impl VictorOpsNotifier {
    /// Create a notifier; no I/O is performed
    pub fn new(config: &Config, client: Arc<dyn HttpClient>) -> Self {
        tracing::debug!(
            enabled = config.enabled,
            global = config.global,
            "Created VictorOps notifier"
        );

        Self {
            state: RwLock::new(NotifierState::from(config)),
            client,
        }
    }

    pub fn open(&self) -> Result<(), VictorOpsError> {
        Ok(())
    }

    pub fn close(&self) -> Result<(), VictorOpsError> {
        Ok(())
    }

    /// Replace the configuration. Exactly one config object is accepted.
    pub fn update(&self, new_configs: &[serde_json::Value]) -> Result<(), VictorOpsError> {
        let [value] = new_configs else {
            return Err(VictorOpsError::InvalidUpdate(format!(
                "expected only one new config object, got {}",
                new_configs.len()
            )));
        };

        let config = Config::deserialize(value).map_err(|e| {
            VictorOpsError::InvalidUpdate(format!("expected a VictorOps config object: {}", e))
        })?;

        *self.state.write() = NotifierState::from(&config);

        tracing::info!(
            enabled = config.enabled,
            global = config.global,
            "VictorOps configuration updated"
        );
        Ok(())
    }

    /// Whether this notifier receives every alert
    pub fn is_global(&self) -> bool {
        self.state.read().global
    }

    /// Default payload for a service test
    pub fn test_options(&self) -> TestOptions {
        let state = self.state.read();
        TestOptions {
            routing_key: state.routing_key.clone(),
            message_type: TEST_MESSAGE_TYPE.to_string(),
            message: TEST_MESSAGE.to_string(),
            entity_id: TEST_ENTITY_ID.to_string(),
        }
    }

    /// Send a test alert built from `options`
    pub async fn test(&self, options: &serde_json::Value) -> Result<(), VictorOpsError> {
        let options = TestOptions::deserialize(options)
            .map_err(|e| VictorOpsError::InvalidOptionsType(e.to_string()))?;

        self.alert(
            &options.routing_key,
            &options.message_type,
            &options.message,
            &options.entity_id,
            Utc::now(),
            None::<&serde_json::Value>,
        )
        .await
    }

    /// Deliver an alert. An empty `routing_key` selects the configured default.
    pub async fn alert<D>(
        &self,
        routing_key: &str,
        message_type: &str,
        message: &str,
        entity_id: &str,
        timestamp: DateTime<Utc>,
        details: Option<&D>,
    ) -> Result<(), VictorOpsError>
    where
        D: Serialize + ?Sized + Sync,
    {
        let (url, body) = self.prepare_delivery(
            routing_key,
            message_type,
            message,
            entity_id,
            timestamp,
            details,
        )?;

        let response = self.client.post_json(&url, body).await?;
        let result = classify_response(response);

        match &result {
            Ok(()) => tracing::debug!(
                message_type = %message_type,
                entity_id = %entity_id,
                "VictorOps alert delivered"
            ),
            Err(e) => tracing::debug!(
                message_type = %message_type,
                entity_id = %entity_id,
                error = %e,
                "VictorOps rejected alert"
            ),
        }

        result
    }

    /// Build the destination URL and JSON body for an alert
    pub fn prepare_delivery<D>(
        &self,
        routing_key: &str,
        message_type: &str,
        message: &str,
        entity_id: &str,
        timestamp: DateTime<Utc>,
        details: Option<&D>,
    ) -> Result<(String, Vec<u8>), VictorOpsError>
    where
        D: Serialize + ?Sized,
    {
        // Enabled flag, default key and URL come from one lock acquisition
        let url = {
            let state = self.state.read();
            if !state.enabled {
                return Err(VictorOpsError::NotEnabled);
            }
            let routing_key = if routing_key.is_empty() {
                state.routing_key.as_str()
            } else {
                routing_key
            };
            // Routing keys are appended unescaped
            format!("{}{}", state.url, routing_key)
        };

        let mut payload = AlertPayload::new(message_type, message, entity_id, timestamp);
        if let Some(details) = details {
            payload = payload.with_details(details)?;
        }

        Ok((url, payload.to_body()?))
    }
}

/// Whether the response body is needed to classify `status`
pub(crate) fn status_needs_body(status: u16) -> bool {
    !matches!(status, 200 | 404)
}

/// Map a receiver response to the alert outcome
fn classify_response(response: HttpResponse) -> Result<(), VictorOpsError> {
    match response.status {
        200 => Ok(()),
        404 => Err(VictorOpsError::NotFound),
        status => {
            // Best effort: only the first JSON value is read, and any decode
            // failure keeps the fallback message
            let message = serde_json::Deserializer::from_str(&response.body)
                .into_iter::<ErrorResponse>()
                .next()
                .and_then(Result::ok)
                .and_then(|r| r.message)
                .unwrap_or_else(|| {
                    format!(
                        "failed to understand VictorOps response. code: {} content: {}",
                        status, response.body
                    )
                });
            Err(VictorOpsError::Remote(message))
        }
    }
}

/// VictorOps notifier errors
#[derive(Debug, thiserror::Error)]
pub enum VictorOpsError {
    #[error("invalid config update: {0}")]
    InvalidUpdate(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("service is not enabled")]
    NotEnabled,

    #[error("failed to serialize alert: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Transport(String),

    #[error("URL or API key not found: 404")]
    NotFound,

    #[error("{0}")]
    Remote(String),

    #[error("unexpected test options: {0}")]
    InvalidOptionsType(String),
}
