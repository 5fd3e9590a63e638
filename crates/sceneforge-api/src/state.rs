//! Application state shared across all handlers.

use std::sync::Arc;

use sceneforge_core::config::AppConfig;
use sceneforge_engine::ConversionPipeline;
use sceneforge_realtime::StatusHub;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Conversion orchestrator
    pub pipeline: Arc<ConversionPipeline>,
    /// Per-job status event fan-out
    pub status: Arc<StatusHub>,
}
