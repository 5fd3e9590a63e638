//! Unified error type for the conversion pipeline.
//!
//! All subsystem errors (validation, workspace, subprocess execution) are
//! consolidated into a single `ConversionError` enum that maps cleanly to
//! `sceneforge_core::error::AppError`.

use sceneforge_core::error::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all conversion operations.
#[derive(Debug, Error)]
pub enum ConversionError {
    // --- Validation errors ---
    /// Upload carried an empty filename.
    #[error("Empty filename")]
    EmptyFilename,

    /// Upload filename does not carry the expected source extension.
    #[error("File must be a .blend: {filename}")]
    UnsupportedExtension {
        /// The rejected filename.
        filename: String,
    },

    // --- Process execution errors ---
    /// Blender process exceeded its wall-clock budget.
    #[error("Conversion timed out after {timeout_seconds}s")]
    BlenderTimeout {
        /// The timeout duration that was exceeded.
        timeout_seconds: u64,
    },

    /// Blender exited with a non-zero status.
    #[error("Blender exited with code {code}")]
    BlenderFailed {
        /// The exit code.
        code: i32,
        /// Captured stderr output (truncated).
        stderr: String,
        /// Captured stdout output (truncated).
        stdout: String,
    },

    /// Blender exited cleanly but the output file was not created.
    ///
    /// Distinguished from a non-zero exit because it indicates silent
    /// engine misbehavior rather than a reported failure.
    #[error("Output file not created: {path}")]
    OutputNotCreated {
        /// Expected output path.
        path: PathBuf,
        /// Captured stderr output (truncated).
        stderr: String,
        /// Captured stdout output (truncated).
        stdout: String,
    },

    /// Internal semaphore error.
    #[error("Internal semaphore error: {reason}")]
    SemaphoreClosed {
        /// Description of which semaphore failed.
        reason: String,
    },

    // --- Generic errors ---
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::EmptyFilename | ConversionError::UnsupportedExtension { .. } => {
                AppError::validation(err.to_string())
            }
            ConversionError::BlenderTimeout { timeout_seconds } => AppError::timeout(format!(
                "Conversion took too long (>{timeout_seconds} s)"
            )),
            ConversionError::BlenderFailed {
                code,
                ref stderr,
                ref stdout,
            } => {
                let details = if stderr.is_empty() { stdout } else { stderr };
                AppError::converter("Conversion error")
                    .with_details(details.clone())
                    .with_exit_code(code)
            }
            ConversionError::OutputNotCreated {
                ref stderr,
                ref stdout,
                ..
            } => {
                let details = if stderr.is_empty() { stdout } else { stderr };
                AppError::missing_output("Conversion produced no output file")
                    .with_details(details.clone())
            }
            ConversionError::SemaphoreClosed { .. } => {
                AppError::service_unavailable("Converter is shutting down")
            }
            ConversionError::Io(_) => AppError::internal(err.to_string()),
        }
    }
}
