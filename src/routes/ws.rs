use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::broadcast;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/notifications/:user_id", get(subscribe))
}

/// Upgrade to a WebSocket streaming notification snapshots for one user.
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_notifications(socket, state, user_id))
}

async fn stream_notifications(mut socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let mut rx = state.hub.subscribe(&user_id).await;
    tracing::info!("WebSocket subscriber connected for user {}", user_id);

    loop {
        tokio::select! {
            payload = rx.recv() => {
                match payload {
                    Ok(json) => {
                        if socket.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "WebSocket subscriber for user {} lagged, {} snapshot(s) dropped",
                            user_id,
                            skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    // Client messages are ignored; the stream is one-way.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::info!("WebSocket subscriber disconnected for user {}", user_id);
}
