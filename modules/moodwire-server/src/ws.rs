//! WebSocket subscription endpoint.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use moodwire_common::MoodwireError;

use crate::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Register the socket and forward queued samples to it until either side
/// closes, then unregister.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (id, mut rx) = state.registry.register().await;
    info!(subscriber = %id, "WebSocket subscriber connected");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = rx.recv() => {
                // None means the registry dropped us (pruned after a
                // delivery failure).
                let Some(frame) = frame else { break };
                if let Err(e) = sink.send(Message::Text(frame.as_str().into())).await {
                    let err = MoodwireError::Delivery(e.to_string());
                    warn!(subscriber = %id, error = %err, "Failed to deliver sample");
                    break;
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!(subscriber = %id, error = %e, "WebSocket read error");
                        break;
                    }
                    // Inbound frames carry no meaning on this endpoint.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.registry.unregister(id).await;
    info!(subscriber = %id, "WebSocket subscriber disconnected");
}
