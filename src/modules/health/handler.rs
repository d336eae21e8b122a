use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;
use utoipa::ToSchema;

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// Call once at startup so uptime is measured from process start.
pub fn mark_started() {
    let _ = STARTED_AT.set(Instant::now());
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    /// Round-trip time of the database probe, in milliseconds.
    pub database_latency_ms: u64,
    pub uptime_seconds: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthResponse>),
        (status = 503, description = "Database unreachable")
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let probe = sqlx::query_scalar::<_, String>("SELECT version()")
        .fetch_one(&state.db)
        .await;
    let latency = started.elapsed().as_millis() as u64;

    let uptime = STARTED_AT
        .get()
        .map(|t| t.elapsed().as_secs())
        .unwrap_or(0);

    match probe {
        Ok(_) => ApiSuccess(
            ApiResponse::success(
                HealthResponse {
                    status: "ok".to_string(),
                    database: "up".to_string(),
                    database_latency_ms: latency,
                    uptime_seconds: uptime,
                },
                "Service healthy",
            ),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(
            format!("Database unreachable: {}", e),
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .into_response(),
    }
}
