//! Domain models split into separate files.
//! This module re-exports individual model modules so imports like
//! `use crate::db::models::*;` work across the crate.

pub mod channel;
pub mod delivery_attempt;
pub mod notification;
pub mod notification_status;
pub mod notification_type;

pub use self::channel::Channel;
pub use self::delivery_attempt::DeliveryAttempt;
pub use self::notification::{Notification, NotificationId};
pub use self::notification_status::NotificationStatus;
pub use self::notification_type::NotificationType;
