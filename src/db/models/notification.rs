use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::delivery_attempt::DeliveryAttempt;
use super::notification_status::NotificationStatus;
use super::notification_type::NotificationType;

/// Opaque unique notification identifier. Generated fresh (random UUID) at
/// creation time and never reused; equality and hashing by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate root modelling a single notification's lifecycle and delivery
/// history.
///
/// Fields are private: the only ways in are [`Notification::new`] (forces
/// status `Pending` with an empty attempt ledger), the two mutators
/// [`Notification::add_delivery_attempt`] and
/// [`Notification::mark_as_read`], and the persistence-layer
/// [`Notification::rehydrate`]. That keeps the status invariant (a pure
/// function of the attempt sequence plus read marking) enforceable. The
/// channel set is fixed at creation; attempts should only be recorded for
/// configured channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    id: NotificationId,
    user_id: String,
    user_email: String,
    title: String,
    message: String,
    #[serde(rename = "type")]
    notification_type: NotificationType,
    status: NotificationStatus,
    channels: Vec<Channel>,
    delivery_attempts: Vec<DeliveryAttempt>,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    read_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<String>,
}

#[allow(clippy::too_many_arguments)]
impl Notification {
    pub fn new(
        id: NotificationId,
        user_id: impl Into<String>,
        user_email: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        notification_type: NotificationType,
        channels: Vec<Channel>,
        metadata: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            user_email: user_email.into(),
            title: title.into(),
            message: message.into(),
            notification_type,
            status: NotificationStatus::Pending,
            channels,
            delivery_attempts: Vec::new(),
            created_at,
            read_at: None,
            metadata,
        }
    }

    /// Reconstruct a previously persisted notification, state included.
    /// Persistence-layer entry point; everything else goes through `new`.
    pub(crate) fn rehydrate(
        id: NotificationId,
        user_id: String,
        user_email: String,
        title: String,
        message: String,
        notification_type: NotificationType,
        status: NotificationStatus,
        channels: Vec<Channel>,
        delivery_attempts: Vec<DeliveryAttempt>,
        created_at: DateTime<Utc>,
        read_at: Option<DateTime<Utc>>,
        metadata: Option<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            user_email,
            title,
            message,
            notification_type,
            status,
            channels,
            delivery_attempts,
            created_at,
            read_at,
            metadata,
        }
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    pub fn status(&self) -> NotificationStatus {
        self.status
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn delivery_attempts(&self) -> &[DeliveryAttempt] {
        &self.delivery_attempts
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    /// Append a delivery attempt and derive the new status from it.
    ///
    /// The most recent attempt decides between `Sent` and `Failed`. A
    /// notification already marked `Read` keeps that status: the attempt is
    /// still recorded for diagnostics, but read state is terminal.
    pub fn add_delivery_attempt(
        &mut self,
        channel: Channel,
        successful: bool,
        error: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.delivery_attempts
            .push(DeliveryAttempt::new(channel, successful, error, at));

        if self.status != NotificationStatus::Read {
            self.status = if successful {
                NotificationStatus::Sent
            } else {
                NotificationStatus::Failed
            };
        }
    }

    /// Transition to `Read`, overwriting `read_at` with the given instant.
    pub fn mark_as_read(&mut self, at: DateTime<Utc>) {
        self.status = NotificationStatus::Read;
        self.read_at = Some(at);
    }
}
