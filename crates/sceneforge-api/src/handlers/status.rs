//! Status WebSocket handler.
//!
//! Clients connect before (or while) uploading with the same job id and
//! receive ordered milestone events. The stream closes when the job
//! reaches a terminal state, and a client disconnect tears the
//! subscription down immediately.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// GET /status/{job_id} — WebSocket upgrade
pub async fn status_upgrade(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| forward_status(state, job_id, socket))
}

/// Forwards every event for one job to the socket, then closes.
///
/// The inbound side is polled alongside the subscription so a client
/// that goes away is detected without waiting for the job to publish;
/// the subscription unregisters itself when this task returns.
async fn forward_status(state: AppState, job_id: String, socket: WebSocket) {
    info!(job_id = %job_id, "Status subscriber connected");
    let mut subscription = state.status.subscribe(&job_id);
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else {
                    // Channel closed: the job finished one way or the other.
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(job_id = %job_id, error = %e, "Failed to serialize status event");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    debug!(job_id = %job_id, "Status subscriber went away");
                    break;
                }
            }
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(job_id = %job_id, "Status subscriber disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(job_id = %job_id, error = %e, "Status socket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    info!(job_id = %job_id, "Status stream ended");
}
