//! Convenience result type alias for SceneForge.

use crate::error::AppError;

/// A specialized `Result` type for SceneForge operations.
pub type AppResult<T> = Result<T, AppError>;
