use serde::{Deserialize, Serialize};

/// Command for a successful-login event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEventCommand {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub ip: String,
}

/// Command shared by new-order and order-status-change events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCommand {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub order_id: String,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub point_of_sale_id: Option<String>,
}

/// Command for the password-reset request/verified/completed events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetCommand {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub verification_code: Option<String>,
}

/// Command for payment completed/failed events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCommand {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub order_id: String,
    pub amount: f64,
    pub payment_method: String,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Tagged union over the eight inbound event kinds.
///
/// One variant per notification-triggering occurrence; the factory and the
/// orchestrator dispatch over this instead of duplicating an eight-way
/// method split through every layer.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    Login(LoginEventCommand),
    NewOrder(OrderCommand),
    OrderStatusChange(OrderCommand),
    PasswordResetRequest(PasswordResetCommand),
    PasswordResetVerified(PasswordResetCommand),
    PasswordResetCompleted(PasswordResetCommand),
    PaymentCompleted(PaymentCommand),
    PaymentFailed(PaymentCommand),
}

impl NotificationEvent {
    /// Short kind label used in logs and processing-error wrappers.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::Login(_) => "login",
            NotificationEvent::NewOrder(_) => "new order",
            NotificationEvent::OrderStatusChange(_) => "order status",
            NotificationEvent::PasswordResetRequest(_) => "password reset request",
            NotificationEvent::PasswordResetVerified(_) => "password reset verification",
            NotificationEvent::PasswordResetCompleted(_) => "password reset completion",
            NotificationEvent::PaymentCompleted(_) => "payment completed",
            NotificationEvent::PaymentFailed(_) => "payment failed",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            NotificationEvent::Login(c) => &c.user_id,
            NotificationEvent::NewOrder(c) | NotificationEvent::OrderStatusChange(c) => &c.user_id,
            NotificationEvent::PasswordResetRequest(c)
            | NotificationEvent::PasswordResetVerified(c)
            | NotificationEvent::PasswordResetCompleted(c) => &c.user_id,
            NotificationEvent::PaymentCompleted(c) | NotificationEvent::PaymentFailed(c) => {
                &c.user_id
            }
        }
    }

    pub fn email(&self) -> &str {
        match self {
            NotificationEvent::Login(c) => &c.email,
            NotificationEvent::NewOrder(c) | NotificationEvent::OrderStatusChange(c) => &c.email,
            NotificationEvent::PasswordResetRequest(c)
            | NotificationEvent::PasswordResetVerified(c)
            | NotificationEvent::PasswordResetCompleted(c) => &c.email,
            NotificationEvent::PaymentCompleted(c) | NotificationEvent::PaymentFailed(c) => {
                &c.email
            }
        }
    }
}
