//! Liveness and readiness probes. Readiness pings the upstream `/health`
//! endpoint with a short deadline; a gateway that cannot reach its upstream
//! has nothing useful to serve.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::{ApiResponse, AppState};
use crate::constants::timeouts::HEALTH_MS;

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadinessChecks {
    pub upstream: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub uptime: u64,
    pub checks: HealthReadinessChecks,
}

pub async fn health_live() -> impl IntoResponse {
    Json(ApiResponse::success(HealthLiveResponse { status: "alive" }))
}

pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let upstream_ready = state
        .gateway
        .fetch("/health", None, Some(Duration::from_millis(HEALTH_MS)))
        .await
        .map(|reply| reply.status.is_success())
        .unwrap_or(false);

    let body = HealthReadyResponse {
        ready: upstream_ready,
        uptime: state.start_time.elapsed().as_secs(),
        checks: HealthReadinessChecks {
            upstream: upstream_ready,
        },
    };

    let status = if body.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ApiResponse::success(body))).into_response()
}
