//! Status event payload and progress milestone definitions.

use serde::{Deserialize, Serialize};

/// A single status event pushed to a job's subscribers.
///
/// Wire shape: `{"type": "status", "message": "...", "progress": 60}`,
/// with `progress` omitted when not supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Progress/status update for a running conversion.
    Status {
        /// Human-readable status message.
        message: String,
        /// Progress percentage (0-100).
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<u8>,
    },
}

impl StatusEvent {
    /// Create a status event.
    pub fn status(message: impl Into<String>, progress: Option<u8>) -> Self {
        Self::Status {
            message: message.into(),
            progress,
        }
    }

    /// The progress value carried by this event, if any.
    pub fn progress(&self) -> Option<u8> {
        match self {
            Self::Status { progress, .. } => *progress,
        }
    }

    /// The message carried by this event.
    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. } => message,
        }
    }
}

/// Fixed progress checkpoints published by the conversion pipeline.
///
/// Values are monotonically increasing; the pipeline publishes them in
/// order and stops at the failure point when a stage fails.
pub mod milestone {
    /// Request received, engine contact established.
    pub const RECEIVED: u8 = 5;
    /// Upload persisted into the job workspace.
    pub const STAGED: u8 = 20;
    /// Blender subprocess running.
    pub const CONVERTING: u8 = 60;
    /// Output verification and final preparation.
    pub const VERIFYING: u8 = 85;
    /// Conversion finished, artifact ready.
    pub const DONE: u8 = 100;
}
