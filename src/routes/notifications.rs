use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use crate::error::{AppError, AppResult};
use crate::services::queries::{NotificationResponse, NotificationStatsResponse};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pending", get(list_pending))
        .route("/user/:user_id", get(list_for_user))
        .route("/user/:user_id/unread", get(list_unread_for_user))
        .route("/user/:user_id/stats", get(stats_for_user))
        .route("/:id", get(get_by_id).delete(delete_notification))
        .route("/:id/read", patch(mark_as_read))
}

/// List all notifications for a user, newest first. Unknown users get an
/// empty list.
async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let notifications = state.queries.get_by_user_id(&user_id).await?;
    Ok(Json(notifications))
}

/// List unread (PENDING or SENT) notifications for a user.
async fn list_unread_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let notifications = state.queries.get_unread_by_user_id(&user_id).await?;
    Ok(Json(notifications))
}

/// Reporting view: notifications that never got a delivery attempt.
async fn list_pending(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let notifications = state.queries.get_pending().await?;
    Ok(Json(notifications))
}

/// Per-status notification counts for a user.
async fn stats_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<NotificationStatsResponse>> {
    let stats = state.queries.get_stats(&user_id).await?;
    Ok(Json(stats))
}

async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationResponse>> {
    match state.queries.get_by_id(&id).await? {
        Some(notification) => Ok(Json(notification)),
        None => Err(AppError::NotFound(format!("Notification {} not found", id))),
    }
}

async fn mark_as_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.queries.mark_as_read(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletion is not part of the notification lifecycle; the endpoint exists
/// for API symmetry and acknowledges without touching stored state.
async fn delete_notification(Path(id): Path<String>) -> StatusCode {
    tracing::debug!("Ignoring delete request for notification {}", id);
    StatusCode::NO_CONTENT
}
