use serde::{Deserialize, Serialize};

/// Event category a notification belongs to.
///
/// Used for filtering and client-side rendering; delivery rules live in the
/// factory, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    SecurityLogin,
    OrderConfirmed,
    SecurityPasswordReset,
    OrderInPreparation,
    OrderReady,
    OrderDelivered,
    OrderRefunded,
    SellerNewOrder,
    System,
    PaymentCompleted,
    PaymentProcessed,
    PaymentFailed,
    PaymentCreated,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::SecurityLogin => "SECURITY_LOGIN",
            NotificationType::OrderConfirmed => "ORDER_CONFIRMED",
            NotificationType::SecurityPasswordReset => "SECURITY_PASSWORD_RESET",
            NotificationType::OrderInPreparation => "ORDER_IN_PREPARATION",
            NotificationType::OrderReady => "ORDER_READY",
            NotificationType::OrderDelivered => "ORDER_DELIVERED",
            NotificationType::OrderRefunded => "ORDER_REFUNDED",
            NotificationType::SellerNewOrder => "SELLER_NEW_ORDER",
            NotificationType::System => "SYSTEM",
            NotificationType::PaymentCompleted => "PAYMENT_COMPLETED",
            NotificationType::PaymentProcessed => "PAYMENT_PROCESSED",
            NotificationType::PaymentFailed => "PAYMENT_FAILED",
            NotificationType::PaymentCreated => "PAYMENT_CREATED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SECURITY_LOGIN" => Some(NotificationType::SecurityLogin),
            "ORDER_CONFIRMED" => Some(NotificationType::OrderConfirmed),
            "SECURITY_PASSWORD_RESET" => Some(NotificationType::SecurityPasswordReset),
            "ORDER_IN_PREPARATION" => Some(NotificationType::OrderInPreparation),
            "ORDER_READY" => Some(NotificationType::OrderReady),
            "ORDER_DELIVERED" => Some(NotificationType::OrderDelivered),
            "ORDER_REFUNDED" => Some(NotificationType::OrderRefunded),
            "SELLER_NEW_ORDER" => Some(NotificationType::SellerNewOrder),
            "SYSTEM" => Some(NotificationType::System),
            "PAYMENT_COMPLETED" => Some(NotificationType::PaymentCompleted),
            "PAYMENT_PROCESSED" => Some(NotificationType::PaymentProcessed),
            "PAYMENT_FAILED" => Some(NotificationType::PaymentFailed),
            "PAYMENT_CREATED" => Some(NotificationType::PaymentCreated),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
