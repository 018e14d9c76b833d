use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::db::models::Notification;

/// Real-time emission port.
///
/// Emission is best-effort snapshot delivery: implementations must swallow
/// their own transport errors and never fail into the delivery protocol.
#[async_trait]
pub trait RealtimeEmitter: Send + Sync {
    async fn emit_user_notification(&self, user_id: &str, notification: &Notification);
}

const CHANNEL_CAPACITY: usize = 64;

/// In-process hub of per-user broadcast channels, bridged to WebSocket
/// connections by the `/ws` route. A user with no open connection simply
/// misses the snapshot; nothing is buffered beyond the channel capacity.
pub struct WebSocketHub {
    channels: RwLock<HashMap<String, broadcast::Sender<String>>>,
}

impl WebSocketHub {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to the snapshot stream for one user, creating the channel
    /// on first use.
    pub async fn subscribe(&self, user_id: &str) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

impl Default for WebSocketHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeEmitter for WebSocketHub {
    async fn emit_user_notification(&self, user_id: &str, notification: &Notification) {
        let payload = match serde_json::to_string(notification) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(
                    "Failed to serialize notification {} for user {}: {}",
                    notification.id(),
                    user_id,
                    e
                );
                return;
            }
        };

        let channels = self.channels.read().await;
        match channels.get(user_id) {
            Some(sender) => {
                // A send error only means no subscriber is currently
                // connected; the snapshot is best-effort either way.
                match sender.send(payload) {
                    Ok(receivers) => tracing::debug!(
                        "Emitted notification {} to {} subscriber(s) of user {}",
                        notification.id(),
                        receivers,
                        user_id
                    ),
                    Err(_) => tracing::debug!(
                        "No active subscribers for user {}; notification {} not emitted",
                        user_id,
                        notification.id()
                    ),
                }
            }
            None => tracing::debug!(
                "No websocket channel for user {}; notification {} not emitted",
                user_id,
                notification.id()
            ),
        }
    }
}
