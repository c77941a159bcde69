use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use tokio::sync::broadcast;
use tracing::debug;

use super::AppState;
use crate::domain::ProductEvent;

/// Upgrade to a WebSocket that streams product change events as JSON.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let events = state.events.subscribe();
    ws.on_upgrade(move |socket| relay_events(socket, events))
}

async fn relay_events(mut socket: WebSocket, mut events: broadcast::Receiver<ProductEvent>) {
    loop {
        tokio::select! {
            inbound = socket.recv() => match inbound {
                // Inbound client messages are keep-alive only.
                Some(Ok(_)) => {}
                _ => break,
            },
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(payload) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if socket.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!(missed, "observer lagged behind, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    debug!("observer disconnected");
}
