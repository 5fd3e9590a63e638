//! Health and format discovery handlers.

use axum::Json;
use axum::extract::State;

use sceneforge_core::formats::{SOURCE_EXT, TARGET_EXT};

use crate::dto::response::{FormatsResponse, HealthResponse};
use crate::state::AppState;

/// GET /
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "SceneForge Converter".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /formats
pub async fn formats(State(state): State<AppState>) -> Json<FormatsResponse> {
    Json(FormatsResponse {
        input: vec![SOURCE_EXT.to_string()],
        output: vec![TARGET_EXT.to_string()],
        max_size_mb: state.config.engine.max_upload_mb,
    })
}
