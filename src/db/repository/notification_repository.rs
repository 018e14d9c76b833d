use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::db::models::{Notification, NotificationId, NotificationStatus, NotificationType};
use crate::error::{AppError, AppResult};

/// Persistence port for notifications.
///
/// The orchestrator and query service only depend on this trait; the
/// concrete SQLite repository below is wired in at startup, and tests
/// substitute in-memory fakes. `save` is an upsert: the delivery protocol
/// saves the same notification id twice per event (before and after the
/// email attempt) and must see its own first write.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn save(&self, notification: &Notification) -> AppResult<Notification>;

    async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>>;

    /// All notifications for a user, newest first.
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<Notification>>;

    async fn find_by_user_id_and_status(
        &self,
        user_id: &str,
        status: NotificationStatus,
    ) -> AppResult<Vec<Notification>>;

    /// Notifications still awaiting a first delivery attempt, oldest first.
    async fn find_pending(&self) -> AppResult<Vec<Notification>>;

    async fn count_by_user_id_and_status(
        &self,
        user_id: &str,
        status: NotificationStatus,
    ) -> AppResult<i64>;

    async fn exists_by_user_id_and_type(
        &self,
        user_id: &str,
        notification_type: NotificationType,
    ) -> AppResult<bool>;
}

/// Row shape for the `notifications` table. Channel and attempt lists are
/// stored as JSON text, timestamps as RFC 3339 strings.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub status: String,
    pub channels: String,
    pub delivery_attempts: String,
    pub created_at: String,
    pub read_at: Option<String>,
    pub metadata: Option<String>,
}

fn parse_instant(raw: &str, column: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid {} timestamp {:?}: {}", column, raw, e)))
}

impl NotificationRow {
    pub fn from_notification(n: &Notification) -> AppResult<Self> {
        let channels = serde_json::to_string(n.channels())
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        let delivery_attempts = serde_json::to_string(n.delivery_attempts())
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

        Ok(NotificationRow {
            id: n.id().value().to_string(),
            user_id: n.user_id().to_string(),
            user_email: n.user_email().to_string(),
            title: n.title().to_string(),
            message: n.message().to_string(),
            notification_type: n.notification_type().as_str().to_string(),
            status: n.status().as_str().to_string(),
            channels,
            delivery_attempts,
            created_at: n.created_at().to_rfc3339(),
            read_at: n.read_at().map(|t| t.to_rfc3339()),
            metadata: n.metadata().map(str::to_string),
        })
    }

    pub fn into_notification(self) -> AppResult<Notification> {
        let notification_type = NotificationType::parse(&self.notification_type).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "unknown notification type {:?} in row {}",
                self.notification_type,
                self.id
            ))
        })?;
        let status = NotificationStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "unknown notification status {:?} in row {}",
                self.status,
                self.id
            ))
        })?;

        let channels = serde_json::from_str(&self.channels)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        let delivery_attempts = serde_json::from_str(&self.delivery_attempts)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

        let created_at = parse_instant(&self.created_at, "created_at")?;
        let read_at = match self.read_at {
            Some(raw) => Some(parse_instant(&raw, "read_at")?),
            None => None,
        };

        Ok(Notification::rehydrate(
            NotificationId::new(self.id),
            self.user_id,
            self.user_email,
            self.title,
            self.message,
            notification_type,
            status,
            channels,
            delivery_attempts,
            created_at,
            read_at,
            self.metadata,
        ))
    }
}

const SELECT_COLUMNS: &str = "id, user_id, user_email, title, message, notification_type, \
     status, channels, delivery_attempts, created_at, read_at, metadata";

/// SQLite-backed [`NotificationStore`].
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn rows_to_notifications(rows: Vec<NotificationRow>) -> AppResult<Vec<Notification>> {
        rows.into_iter().map(|r| r.into_notification()).collect()
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn save(&self, notification: &Notification) -> AppResult<Notification> {
        let row = NotificationRow::from_notification(notification)?;

        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, user_id, user_email, title, message, notification_type,
                status, channels, delivery_attempts, created_at, read_at, metadata
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                channels = excluded.channels,
                delivery_attempts = excluded.delivery_attempts,
                read_at = excluded.read_at,
                metadata = excluded.metadata
            "#,
        )
        .bind(&row.id)
        .bind(&row.user_id)
        .bind(&row.user_email)
        .bind(&row.title)
        .bind(&row.message)
        .bind(&row.notification_type)
        .bind(&row.status)
        .bind(&row.channels)
        .bind(&row.delivery_attempts)
        .bind(&row.created_at)
        .bind(&row.read_at)
        .bind(&row.metadata)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(notification.clone())
    }

    async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {} FROM notifications WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        row.map(NotificationRow::into_notification).transpose()
    }

    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {} FROM notifications WHERE user_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Self::rows_to_notifications(rows)
    }

    async fn find_by_user_id_and_status(
        &self,
        user_id: &str,
        status: NotificationStatus,
    ) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {} FROM notifications WHERE user_id = ? AND status = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Self::rows_to_notifications(rows)
    }

    async fn find_pending(&self) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {} FROM notifications WHERE status = 'PENDING' ORDER BY created_at ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Self::rows_to_notifications(rows)
    }

    async fn count_by_user_id_and_status(
        &self,
        user_id: &str,
        status: NotificationStatus,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(count)
    }

    async fn exists_by_user_id_and_type(
        &self,
        user_id: &str,
        notification_type: NotificationType,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND notification_type = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(notification_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(count > 0)
    }
}
