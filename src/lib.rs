//! VictorOps Sink: alert delivery to the VictorOps REST endpoint
//!
//! Takes alert events from an alerting pipeline and forwards each one to
//! VictorOps as a single synchronous POST, classifying transport and remote
//! failures into [`VictorOpsError`].
//!
//! # Features
//!
//! - **Hot reconfiguration**: `update` swaps the whole configuration atomically
//! - **Routing keys**: per-alert routing key with a configured default
//! - **Service tests**: fixed test payload to validate connectivity
//! - **HTTP API**: service tests, alert submission and config updates over axum
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use victorops_sink::alerts::{Config, ReqwestHttpClient, VictorOpsNotifier};
//!
//! # async fn run() -> Result<(), victorops_sink::VictorOpsError> {
//! let config = Config::new("my-api-key", "ops-team");
//! let notifier = VictorOpsNotifier::new(&config, Arc::new(ReqwestHttpClient::new()));
//!
//! let details = serde_json::json!({"host": "db-1", "value": 97.2});
//! notifier
//!     .alert("", "CRITICAL", "disk almost full", "db-1/disk", chrono::Utc::now(), Some(&details))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod api;

// Re-export commonly used types
pub use alerts::{Config, TestOptions, VictorOpsError, VictorOpsNotifier};
