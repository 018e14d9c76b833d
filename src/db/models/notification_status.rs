use serde::{Deserialize, Serialize};

/// Lifecycle state of a notification.
///
/// `Pending` at rest with zero delivery attempts; `Sent`/`Failed` track the
/// outcome of the most recent attempt; `Read` is set by the read-state
/// transition and is terminal for the status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Read,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "PENDING",
            NotificationStatus::Sent => "SENT",
            NotificationStatus::Read => "READ",
            NotificationStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(NotificationStatus::Pending),
            "SENT" => Some(NotificationStatus::Sent),
            "READ" => Some(NotificationStatus::Read),
            "FAILED" => Some(NotificationStatus::Failed),
            _ => None,
        }
    }

    /// Unread means the user has not acted on the notification and delivery
    /// has not definitively failed.
    pub fn is_unread(&self) -> bool {
        matches!(self, NotificationStatus::Pending | NotificationStatus::Sent)
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
