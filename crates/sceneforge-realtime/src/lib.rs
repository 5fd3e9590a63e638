//! # sceneforge-realtime
//!
//! Status event channel for SceneForge. Provides:
//!
//! - A per-job pub/sub hub keyed by opaque job identifier
//! - Ordered, fire-and-forget delivery to whichever listeners subscribed
//! - A cheap no-op path for jobs submitted without an identifier
//! - The fixed progress milestones published by the conversion pipeline

pub mod hub;
pub mod message;

pub use hub::{StatusHub, StatusSubscription};
pub use message::{StatusEvent, milestone};
