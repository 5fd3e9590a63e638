//! # sceneforge-api
//!
//! HTTP API layer for SceneForge built on Axum.
//!
//! Provides the conversion upload endpoint, health and format discovery
//! routes, the per-job status WebSocket, CORS middleware, and error
//! mapping to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
