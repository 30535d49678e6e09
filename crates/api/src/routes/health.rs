//! Health Route

use axum::Json;
use serde::Serialize;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness check
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}
