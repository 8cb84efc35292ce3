//! VictorOps alert delivery
//!
//! Formats alert events into the VictorOps REST payload and posts them to
//! the configured endpoint, one attempt per alert.

pub mod client;
pub mod config;
pub mod notifier;
pub mod payload;

pub use client::{HttpClient, HttpResponse, ReqwestHttpClient};
pub use config::Config;
pub use notifier::{TestOptions, VictorOpsError, VictorOpsNotifier};
pub use payload::{AlertPayload, MONITORING_TOOL};
