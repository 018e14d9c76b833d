use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::Channel;

/// Immutable record of one delivery try over one channel.
///
/// Attempts are appended to a notification in chronological order and never
/// mutated or removed. `error` carries caller-supplied context about why
/// delivery failed (transport error message); it is stored for diagnostics
/// and not interpreted further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub channel: Channel,
    pub successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DeliveryAttempt {
    pub fn new(
        channel: Channel,
        successful: bool,
        error: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            channel,
            successful,
            error,
            timestamp,
        }
    }
}
