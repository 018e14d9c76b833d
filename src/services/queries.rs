use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::models::{Notification, NotificationId, NotificationStatus, NotificationType};
use crate::db::repository::NotificationStore;
use crate::error::AppResult;
use crate::services::clock::Clock;

/// Read-side projection of a notification served to API clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub metadata: Option<String>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        NotificationResponse {
            id: n.id().value().to_string(),
            user_id: n.user_id().to_string(),
            user_email: n.user_email().to_string(),
            title: n.title().to_string(),
            message: n.message().to_string(),
            notification_type: n.notification_type().as_str().to_string(),
            status: n.status().as_str().to_string(),
            created_at: n.created_at(),
            read_at: n.read_at(),
            metadata: n.metadata().map(str::to_string),
        }
    }
}

/// Per-status notification counts for one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatsResponse {
    pub total_sent: i64,
    pub total_failed: i64,
    pub total_pending: i64,
    pub total_read: i64,
    /// Whether the user has ever received a login security alert.
    pub has_security_alerts: bool,
}

/// Query and read-state operations over persisted notifications.
///
/// Absence is never an error here: unknown users yield empty lists and
/// unknown ids yield `None` / a silent no-op. Store failures propagate.
pub struct NotificationQueryService {
    store: Arc<dyn NotificationStore>,
    clock: Arc<dyn Clock>,
}

impl NotificationQueryService {
    pub fn new(store: Arc<dyn NotificationStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<Vec<NotificationResponse>> {
        let notifications = self.store.find_by_user_id(user_id).await?;
        Ok(notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<NotificationResponse>> {
        let notification = self.store.find_by_id(&NotificationId::new(id)).await?;
        Ok(notification.map(NotificationResponse::from))
    }

    /// Notifications the user has not acted on yet: status PENDING or SENT
    /// (READ and FAILED are excluded). Order is preserved from the
    /// underlying fetch.
    pub async fn get_unread_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<NotificationResponse>> {
        let notifications = self.store.find_by_user_id(user_id).await?;
        Ok(notifications
            .into_iter()
            .filter(|n| n.status().is_unread())
            .map(NotificationResponse::from)
            .collect())
    }

    /// Notifications still awaiting a first delivery attempt, across all
    /// users. Reporting surface; not part of the delivery protocol.
    pub async fn get_pending(&self) -> AppResult<Vec<NotificationResponse>> {
        let notifications = self.store.find_pending().await?;
        Ok(notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }

    /// Per-status counts for one user's notifications.
    pub async fn get_stats(&self, user_id: &str) -> AppResult<NotificationStatsResponse> {
        let (total_sent, total_failed, total_pending, total_read, has_security_alerts) =
            tokio::try_join!(
                self.store
                    .count_by_user_id_and_status(user_id, NotificationStatus::Sent),
                self.store
                    .count_by_user_id_and_status(user_id, NotificationStatus::Failed),
                self.store
                    .count_by_user_id_and_status(user_id, NotificationStatus::Pending),
                self.store
                    .count_by_user_id_and_status(user_id, NotificationStatus::Read),
                self.store
                    .exists_by_user_id_and_type(user_id, NotificationType::SecurityLogin),
            )?;

        Ok(NotificationStatsResponse {
            total_sent,
            total_failed,
            total_pending,
            total_read,
            has_security_alerts,
        })
    }

    /// Mark one notification read. An unknown id does nothing.
    pub async fn mark_as_read(&self, id: &str) -> AppResult<()> {
        let Some(mut notification) = self.store.find_by_id(&NotificationId::new(id)).await? else {
            tracing::debug!("mark_as_read: notification {} not found, ignoring", id);
            return Ok(());
        };

        notification.mark_as_read(self.clock.now());
        self.store.save(&notification).await?;

        tracing::info!("Notification {} marked as read", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Channel, NotificationStatus, NotificationType};
    use crate::error::AppResult;
    use crate::services::clock::test_support::FixedClock;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// In-memory store keyed by id, preserving insertion order on reads.
    struct MemoryStore {
        notifications: Mutex<Vec<Notification>>,
        save_count: Mutex<usize>,
    }

    impl MemoryStore {
        fn with(notifications: Vec<Notification>) -> Self {
            Self {
                notifications: Mutex::new(notifications),
                save_count: Mutex::new(0),
            }
        }

        fn saves(&self) -> usize {
            *self.save_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl NotificationStore for MemoryStore {
        async fn save(&self, notification: &Notification) -> AppResult<Notification> {
            *self.save_count.lock().unwrap() += 1;
            let mut notifications = self.notifications.lock().unwrap();
            match notifications.iter_mut().find(|n| n.id() == notification.id()) {
                Some(existing) => *existing = notification.clone(),
                None => notifications.push(notification.clone()),
            }
            Ok(notification.clone())
        }

        async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>> {
            Ok(self
                .notifications
                .lock()
                .unwrap()
                .iter()
                .find(|n| n.id() == id)
                .cloned())
        }

        async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<Notification>> {
            Ok(self
                .notifications
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.user_id() == user_id)
                .cloned()
                .collect())
        }

        async fn find_by_user_id_and_status(
            &self,
            user_id: &str,
            status: NotificationStatus,
        ) -> AppResult<Vec<Notification>> {
            Ok(self
                .find_by_user_id(user_id)
                .await?
                .into_iter()
                .filter(|n| n.status() == status)
                .collect())
        }

        async fn find_pending(&self) -> AppResult<Vec<Notification>> {
            Ok(self
                .notifications
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.status() == NotificationStatus::Pending)
                .cloned()
                .collect())
        }

        async fn count_by_user_id_and_status(
            &self,
            user_id: &str,
            status: NotificationStatus,
        ) -> AppResult<i64> {
            Ok(self.find_by_user_id_and_status(user_id, status).await?.len() as i64)
        }

        async fn exists_by_user_id_and_type(
            &self,
            user_id: &str,
            notification_type: NotificationType,
        ) -> AppResult<bool> {
            Ok(self
                .notifications
                .lock()
                .unwrap()
                .iter()
                .any(|n| n.user_id() == user_id && n.notification_type() == notification_type))
        }
    }

    fn instant(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn notification(id: &str, user_id: &str, status: NotificationStatus) -> Notification {
        let mut n = Notification::new(
            NotificationId::new(id),
            user_id,
            "test@example.com",
            "Test Title",
            "Test Message",
            NotificationType::OrderConfirmed,
            vec![Channel::Email, Channel::WebSocket],
            Some("{\"key\":\"value\"}".to_string()),
            instant(0),
        );
        match status {
            NotificationStatus::Pending => {}
            NotificationStatus::Sent => n.add_delivery_attempt(Channel::Email, true, None, instant(1)),
            NotificationStatus::Failed => {
                n.add_delivery_attempt(Channel::Email, false, Some("boom".to_string()), instant(1))
            }
            NotificationStatus::Read => n.mark_as_read(instant(1)),
        }
        n
    }

    fn query_service(store: Arc<MemoryStore>) -> NotificationQueryService {
        NotificationQueryService::new(store, Arc::new(FixedClock::at(instant(100))))
    }

    #[tokio::test]
    async fn get_by_user_id_projects_every_field() {
        let store = Arc::new(MemoryStore::with(vec![notification(
            "notif123",
            "user123",
            NotificationStatus::Sent,
        )]));
        let svc = query_service(store);

        let responses = svc.get_by_user_id("user123").await.unwrap();

        assert_eq!(responses.len(), 1);
        let r = &responses[0];
        assert_eq!(r.id, "notif123");
        assert_eq!(r.user_id, "user123");
        assert_eq!(r.user_email, "test@example.com");
        assert_eq!(r.notification_type, "ORDER_CONFIRMED");
        assert_eq!(r.status, "SENT");
        assert_eq!(r.metadata.as_deref(), Some("{\"key\":\"value\"}"));
        assert!(r.read_at.is_none());
    }

    #[tokio::test]
    async fn get_by_user_id_with_no_rows_returns_empty_list() {
        let store = Arc::new(MemoryStore::with(Vec::new()));
        let svc = query_service(store);

        let responses = svc.get_by_user_id("nobody").await.unwrap();

        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn get_by_id_absent_is_none_not_error() {
        let store = Arc::new(MemoryStore::with(Vec::new()));
        let svc = query_service(store);

        assert!(svc.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unread_excludes_read_and_failed() {
        let store = Arc::new(MemoryStore::with(vec![
            notification("n1", "user123", NotificationStatus::Sent),
            notification("n2", "user123", NotificationStatus::Pending),
            notification("n3", "user123", NotificationStatus::Read),
            notification("n4", "user123", NotificationStatus::Failed),
        ]));
        let svc = query_service(store);

        let unread = svc.get_unread_by_user_id("user123").await.unwrap();

        let ids: Vec<&str> = unread.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2"]);
    }

    #[tokio::test]
    async fn stats_count_each_status_bucket() {
        let store = Arc::new(MemoryStore::with(vec![
            notification("n1", "user123", NotificationStatus::Sent),
            notification("n2", "user123", NotificationStatus::Sent),
            notification("n3", "user123", NotificationStatus::Pending),
            notification("n4", "user123", NotificationStatus::Read),
            notification("n5", "other", NotificationStatus::Failed),
        ]));
        let svc = query_service(store);

        let stats = svc.get_stats("user123").await.unwrap();

        assert_eq!(stats.total_sent, 2);
        assert_eq!(stats.total_pending, 1);
        assert_eq!(stats.total_read, 1);
        assert_eq!(stats.total_failed, 0);
        // Every fixture is an order notification; no login alerts on file.
        assert!(!stats.has_security_alerts);
    }

    #[tokio::test]
    async fn pending_report_spans_users() {
        let store = Arc::new(MemoryStore::with(vec![
            notification("n1", "user123", NotificationStatus::Pending),
            notification("n2", "other", NotificationStatus::Pending),
            notification("n3", "user123", NotificationStatus::Sent),
        ]));
        let svc = query_service(store);

        let pending = svc.get_pending().await.unwrap();

        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|r| r.status == "PENDING"));
    }

    #[tokio::test]
    async fn mark_as_read_persists_the_read_transition() {
        let store = Arc::new(MemoryStore::with(vec![notification(
            "notif123",
            "user123",
            NotificationStatus::Sent,
        )]));
        let svc = query_service(store.clone());

        svc.mark_as_read("notif123").await.unwrap();

        assert_eq!(store.saves(), 1);
        let stored = store
            .find_by_id(&NotificationId::new("notif123"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), NotificationStatus::Read);
        assert_eq!(stored.read_at(), Some(instant(100)));
    }

    #[tokio::test]
    async fn mark_as_read_on_unknown_id_saves_nothing_and_succeeds() {
        let store = Arc::new(MemoryStore::with(Vec::new()));
        let svc = query_service(store.clone());

        svc.mark_as_read("missing").await.unwrap();

        assert_eq!(store.saves(), 0);
    }
}
