//! Response DTOs for the SceneForge HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the service is reachable.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
}

/// Body of `GET /formats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatsResponse {
    /// Accepted upload extensions.
    pub input: Vec<String>,
    /// Produced output extensions.
    pub output: Vec<String>,
    /// Maximum accepted upload size in megabytes.
    pub max_size_mb: u64,
}
