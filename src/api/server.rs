use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::handlers::{
    global, health_check, run_service_test, send_alert, test_options, update_config, AppState,
};
use crate::alerts::{Config, ReqwestHttpClient, VictorOpsNotifier};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single delivery attempt
    pub http_timeout_secs: u64,
    pub victorops: Config,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9092,
            http_timeout_secs: 30,
            victorops: Config::default(),
        }
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Service tests
        .route(
            "/service-tests/victorops",
            get(test_options).post(run_service_test),
        )
        // Delivery
        .route("/alert", post(send_alert))
        // Configuration
        .route("/config", put(update_config))
        .route("/config/global", get(global))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.victorops.validate()?;

    let client = ReqwestHttpClient::with_timeout(Duration::from_secs(config.http_timeout_secs))?;
    let notifier = Arc::new(VictorOpsNotifier::new(&config.victorops, Arc::new(client)));
    notifier.open()?;

    if config.victorops.enabled {
        tracing::info!(
            routing_key = %config.victorops.routing_key,
            global = config.victorops.global,
            "VictorOps delivery enabled"
        );
    } else {
        tracing::warn!("VictorOps delivery disabled, alerts will be rejected");
    }

    let state = Arc::new(AppState {
        notifier: Arc::clone(&notifier),
    });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting VictorOps sink on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    notifier.close()?;
    tracing::info!("VictorOps sink stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
