//! Route definitions for the SceneForge HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the route table without middleware.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::health))
        .route("/formats", get(handlers::health::formats))
        .route("/convert", post(handlers::convert::convert))
        .route("/status/{job_id}", get(handlers::status::status_upgrade))
}
