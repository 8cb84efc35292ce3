//! VictorOps request body

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Tag identifying the originating alerting product
pub const MONITORING_TOOL: &str = "kapacitor";

/// Body posted to the VictorOps REST endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertPayload {
    pub message_type: String,
    pub entity_id: String,
    pub state_message: String,
    /// Unix seconds
    pub timestamp: i64,
    pub monitoring_tool: &'static str,
    /// Alert details as JSON text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl AlertPayload {
    pub fn new(
        message_type: &str,
        message: &str,
        entity_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message_type: message_type.to_string(),
            entity_id: entity_id.to_string(),
            state_message: message.to_string(),
            timestamp: timestamp.timestamp(),
            monitoring_tool: MONITORING_TOOL,
            data: None,
        }
    }

    /// Attach details, stored as their JSON text
    pub fn with_details<D>(mut self, details: &D) -> Result<Self, serde_json::Error>
    where
        D: Serialize + ?Sized,
    {
        self.data = Some(serde_json::to_string(details)?);
        Ok(self)
    }

    /// Serialize the request body
    pub fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
