//! Application assembly: routes plus middleware stack.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Build the complete Axum application.
///
/// The body limit comes from configuration so oversized uploads are
/// rejected before they touch the pipeline.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let max_upload = state.config.engine.max_upload_bytes();

    build_router()
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
