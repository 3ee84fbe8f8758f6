//! Health check handlers.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub primary_detector: CheckStatus,
    pub specialist_gate: GateStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Informational only; a busy gate does not make the service unready.
#[derive(Serialize)]
pub struct GateStatus {
    pub busy: bool,
}

/// Readiness check endpoint (readiness).
/// Checks that the primary detector answers.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let start = Instant::now();
    let reachable = state.primary_check.is_reachable().await;

    let primary_detector = if reachable {
        CheckStatus {
            status: "ok".to_string(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        }
    } else {
        CheckStatus {
            status: "unreachable".to_string(),
            latency_ms: None,
        }
    };

    let response = ReadinessResponse {
        status: if reachable { "ready" } else { "degraded" }.to_string(),
        checks: ReadinessChecks {
            primary_detector,
            specialist_gate: GateStatus {
                busy: state.orchestrator.gate().is_busy(),
            },
        },
    };

    if reachable {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
