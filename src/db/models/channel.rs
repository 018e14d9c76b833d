use serde::{Deserialize, Serialize};

/// Delivery medium for a notification.
///
/// Only `Email` and `WebSocket` are exercised by the current event kinds;
/// the remaining variants exist so channel plans can grow without a schema
/// change (attempts and channel sets are stored by name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Email,
    Push,
    InApp,
    Sms,
    WebSocket,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "EMAIL",
            Channel::Push => "PUSH",
            Channel::InApp => "IN_APP",
            Channel::Sms => "SMS",
            Channel::WebSocket => "WEB_SOCKET",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
