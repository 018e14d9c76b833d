use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::error::AppResult;
use crate::services::queries::NotificationResponse;
use crate::services::{
    LoginEventCommand, OrderCommand, PasswordResetCommand, PaymentCommand,
};
use crate::AppState;

/// Inbound event intake: one endpoint per event kind, each decoding a
/// typed command and handing it to the delivery orchestrator. Bus-level
/// delivery guarantees (ack/retry) belong to the caller.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/orders", post(new_order))
        .route("/orders/status", post(order_status_change))
        .route("/password-reset/request", post(password_reset_request))
        .route("/password-reset/verified", post(password_reset_verified))
        .route("/password-reset/completed", post(password_reset_completed))
        .route("/payments/completed", post(payment_completed))
        .route("/payments/failed", post(payment_failed))
}

type EventReply = AppResult<(StatusCode, Json<NotificationResponse>)>;

async fn login(
    State(state): State<Arc<AppState>>,
    Json(command): Json<LoginEventCommand>,
) -> EventReply {
    let notification = state.notifications.process_successful_login(command).await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}

async fn new_order(
    State(state): State<Arc<AppState>>,
    Json(command): Json<OrderCommand>,
) -> EventReply {
    let notification = state.notifications.process_new_order(command).await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}

async fn order_status_change(
    State(state): State<Arc<AppState>>,
    Json(command): Json<OrderCommand>,
) -> EventReply {
    let notification = state.notifications.process_order_status_change(command).await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}

async fn password_reset_request(
    State(state): State<Arc<AppState>>,
    Json(command): Json<PasswordResetCommand>,
) -> EventReply {
    let notification = state
        .notifications
        .process_password_reset_request(command)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}

async fn password_reset_verified(
    State(state): State<Arc<AppState>>,
    Json(command): Json<PasswordResetCommand>,
) -> EventReply {
    let notification = state
        .notifications
        .process_password_reset_verified(command)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}

async fn password_reset_completed(
    State(state): State<Arc<AppState>>,
    Json(command): Json<PasswordResetCommand>,
) -> EventReply {
    let notification = state
        .notifications
        .process_password_reset_completed(command)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}

async fn payment_completed(
    State(state): State<Arc<AppState>>,
    Json(command): Json<PaymentCommand>,
) -> EventReply {
    let notification = state.notifications.process_payment_completed(command).await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}

async fn payment_failed(
    State(state): State<Arc<AppState>>,
    Json(command): Json<PaymentCommand>,
) -> EventReply {
    let notification = state.notifications.process_payment_failed(command).await?;
    Ok((StatusCode::ACCEPTED, Json(notification.into())))
}
