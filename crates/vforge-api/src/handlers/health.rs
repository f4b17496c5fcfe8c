//! Liveness and readiness probes.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use vforge_media::check_ffmpeg;

use crate::state::AppState;

pub async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    /// Check name to `"ok"` or the reason it failed
    pub checks: BTreeMap<&'static str, String>,
}

/// 200 when the engine binary resolves and the bucket answers, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ffmpeg = check_ffmpeg(state.pipeline.invoker().binary())
        .map(|_| ())
        .map_err(|e| e.to_string());
    let storage = state
        .store
        .check_connectivity()
        .await
        .map_err(|e| e.to_string());

    let all_ok = ffmpeg.is_ok() && storage.is_ok();
    let checks = [("ffmpeg", ffmpeg), ("storage", storage)]
        .into_iter()
        .map(|(name, result)| (name, result.err().unwrap_or_else(|| "ok".to_string())))
        .collect();

    if all_ok {
        (StatusCode::OK, Json(ReadinessResponse { status: "ready", checks }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse { status: "degraded", checks }),
        )
    }
}
