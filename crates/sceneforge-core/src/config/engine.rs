//! Configuration for the Blender conversion engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Configuration for the headless Blender converter.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to (or bare command name of) the Blender executable.
    #[serde(default = "default_blender_path")]
    pub blender_path: PathBuf,

    /// Wall-clock timeout in seconds for a single Blender invocation.
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 10, max = 7200))]
    pub timeout_seconds: u64,

    /// Global limit for concurrent Blender subprocesses (CPU/RAM bound).
    #[serde(default = "default_max_concurrency")]
    #[validate(range(min = 1, max = 16))]
    pub max_concurrency: usize,

    /// Root directory for per-job workspaces. Falls back to the system
    /// temp directory when unset.
    #[serde(default)]
    pub temp_root: Option<PathBuf>,

    /// Maximum characters of stdout/stderr retained for diagnostics.
    #[serde(default = "default_capture_chars")]
    pub capture_chars: usize,

    /// Maximum accepted upload size in megabytes.
    #[serde(default = "default_max_upload_mb")]
    #[validate(range(min = 1, max = 1024))]
    pub max_upload_mb: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            blender_path: default_blender_path(),
            timeout_seconds: default_timeout_seconds(),
            max_concurrency: default_max_concurrency(),
            temp_root: None,
            capture_chars: default_capture_chars(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl EngineConfig {
    /// Resolve the effective workspace root directory.
    pub fn effective_temp_root(&self) -> PathBuf {
        self.temp_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("sceneforge"))
    }

    /// Maximum accepted upload size in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize) * 1024 * 1024
    }
}

fn default_blender_path() -> PathBuf {
    PathBuf::from("blender")
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_max_concurrency() -> usize {
    4
}

fn default_capture_chars() -> usize {
    500
}

fn default_max_upload_mb() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.blender_path, PathBuf::from("blender"));
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.capture_chars, 500);
        assert_eq!(config.max_upload_mb, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let config = EngineConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_temp_root_fallback() {
        let config = EngineConfig::default();
        assert!(config.effective_temp_root().ends_with("sceneforge"));

        let explicit = EngineConfig {
            temp_root: Some(PathBuf::from("/data/conversions")),
            ..Default::default()
        };
        assert_eq!(
            explicit.effective_temp_root(),
            PathBuf::from("/data/conversions")
        );
    }

    #[test]
    fn test_max_upload_bytes() {
        let config = EngineConfig::default();
        assert_eq!(config.max_upload_bytes(), 50 * 1024 * 1024);
    }
}
