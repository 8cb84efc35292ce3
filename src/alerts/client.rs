//! HTTP transport used to reach the receiver

use std::time::Duration;

use async_trait::async_trait;

use super::notifier::{status_needs_body, VictorOpsError};

/// Status of a receiver response, with the body when the status alone does
/// not decide the outcome
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over the HTTP client so delivery can be tested without a network
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// POST a JSON body and return the response
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, VictorOpsError>;
}

/// Production HTTP client using reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose requests fail with a transport error after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, VictorOpsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VictorOpsError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, VictorOpsError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| VictorOpsError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if !status_needs_body(status) {
            return Ok(HttpResponse {
                status,
                body: String::new(),
            });
        }

        // Consumes the response; the early return above drops it unread
        let body = response
            .text()
            .await
            .map_err(|e| VictorOpsError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
