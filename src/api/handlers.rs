use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::alerts::{TestOptions, VictorOpsError, VictorOpsNotifier};

/// Application state shared across handlers
pub struct AppState {
    pub notifier: Arc<VictorOpsNotifier>,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Service Tests
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceTestResult {
    pub success: bool,
    pub message: String,
}

pub async fn test_options(State(state): State<Arc<AppState>>) -> Json<TestOptions> {
    Json(state.notifier.test_options())
}

/// Run a service test. Fields in the body override the default test options;
/// an empty body runs the defaults.
pub async fn run_service_test(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ServiceTestResult>, ApiError> {
    let body: serde_json::Value = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let mut options = serde_json::to_value(state.notifier.test_options())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match body {
        serde_json::Value::Null => {}
        serde_json::Value::Object(overrides) => {
            if let Some(target) = options.as_object_mut() {
                target.extend(overrides);
            }
        }
        other => options = other,
    }

    let result = match state.notifier.test(&options).await {
        Ok(()) => ServiceTestResult {
            success: true,
            message: String::new(),
        },
        Err(e @ VictorOpsError::InvalidOptionsType(_)) => return Err(e.into()),
        Err(e) => ServiceTestResult {
            success: false,
            message: e.to_string(),
        },
    };

    Ok(Json(result))
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    /// Empty selects the configured default
    #[serde(default)]
    pub routing_key: String,
    pub message_type: String,
    pub message: String,
    #[serde(rename = "entityID")]
    pub entity_id: String,
    /// Defaults to the time the request is received
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

pub async fn send_alert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AlertRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .notifier
        .alert(
            &request.routing_key,
            &request.message_type,
            &request.message,
            &request.entity_id,
            request.timestamp.unwrap_or_else(Utc::now),
            request.details.as_ref(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Configuration
// ============================================================================

pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(configs): Json<Vec<serde_json::Value>>,
) -> Result<StatusCode, ApiError> {
    state.notifier.update(&configs)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct GlobalResponse {
    pub global: bool,
}

pub async fn global(State(state): State<Arc<AppState>>) -> Json<GlobalResponse> {
    Json(GlobalResponse {
        global: state.notifier.is_global(),
    })
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

impl From<VictorOpsError> for ApiError {
    fn from(err: VictorOpsError) -> Self {
        let message = err.to_string();
        match err {
            VictorOpsError::InvalidUpdate(_)
            | VictorOpsError::InvalidConfig(_)
            | VictorOpsError::InvalidOptionsType(_)
            | VictorOpsError::Serialization(_) => ApiError::BadRequest(message),
            VictorOpsError::NotEnabled => ApiError::Conflict(message),
            VictorOpsError::Transport(_) | VictorOpsError::NotFound | VictorOpsError::Remote(_) => {
                ApiError::BadGateway(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
