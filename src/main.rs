//! VictorOps Sink Server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - SINK_HOST: Bind address (default: 0.0.0.0)
//! - SINK_PORT: Port number (default: 9092)
//! - SINK_HTTP_TIMEOUT_SECS: Timeout for one delivery attempt (default: 30)
//! - RUST_LOG: Log level (default: info)
//!
//! VictorOps configuration:
//! - VICTOROPS_ENABLED: "true" or "1" to deliver alerts (default: false)
//! - VICTOROPS_API_KEY: Account API key
//! - VICTOROPS_ROUTING_KEY: Default routing key
//! - VICTOROPS_URL: REST endpoint (default: the public VictorOps generic alert URL)
//! - VICTOROPS_GLOBAL: "true" to receive every alert

use victorops_sink::alerts::Config;
use victorops_sink::api::{run_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "victorops_sink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("SINK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("SINK_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(9092);
    let http_timeout_secs = std::env::var("SINK_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(30);

    let config = ServerConfig {
        host,
        port,
        http_timeout_secs,
        victorops: Config::from_env(),
    };

    tracing::info!("VictorOps sink configuration:");
    tracing::info!("  Listen: {}:{}", config.host, config.port);
    tracing::info!("  Delivery timeout: {} seconds", config.http_timeout_secs);
    tracing::info!("  Enabled: {}", config.victorops.enabled);
    tracing::info!("  Global: {}", config.victorops.global);

    run_server(config).await
}
