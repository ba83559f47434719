use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;

/// Health data returned by `GET /health`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub engine: EngineStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EngineStatus {
    pub kind: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /health`
///
/// The service itself is always `ok`; an unusable OCR engine is reported in
/// `engine.status` so load balancers keep routing while operators get a signal.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let engine = state.pipeline.engine();

    let engine_status = match engine.probe().await {
        Ok(version) => EngineStatus {
            kind: engine.kind().to_string(),
            status: "available".to_string(),
            version: Some(version),
            reason: None,
        },
        Err(e) => EngineStatus {
            kind: engine.kind().to_string(),
            status: "unavailable".to_string(),
            version: None,
            reason: Some(e.to_string()),
        },
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: engine_status,
    })
}
