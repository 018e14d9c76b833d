use chrono::{DateTime, Utc};

use crate::db::models::{Channel, Notification, NotificationId, NotificationType};
use crate::services::commands::NotificationEvent;

/// Build the notification for one inbound event, before any delivery is
/// attempted.
///
/// Each event kind carries its own title, message template, channel set
/// (order significant: channels are attempted in this order) and metadata
/// keys. The returned notification is always `Pending` with an empty
/// attempt ledger and a freshly generated id.
pub fn build(event: &NotificationEvent, now: DateTime<Utc>) -> Notification {
    match event {
        NotificationEvent::Login(c) => Notification::new(
            NotificationId::generate(),
            &c.user_id,
            &c.email,
            "Login detected",
            format!("Your account was accessed from IP: {}", c.ip),
            NotificationType::SecurityLogin,
            vec![Channel::Email, Channel::WebSocket],
            None,
            now,
        ),
        NotificationEvent::NewOrder(c) => Notification::new(
            NotificationId::generate(),
            &c.user_id,
            &c.email,
            "New Order Received",
            format!("You have a new order #{} to prepare", c.order_id),
            NotificationType::SellerNewOrder,
            vec![Channel::WebSocket, Channel::Email],
            Some(format!(
                "{{\"orderId\":\"{}\",\"pointOfSaleId\":\"{}\"}}",
                c.order_id,
                c.point_of_sale_id.as_deref().unwrap_or_default()
            )),
            now,
        ),
        NotificationEvent::OrderStatusChange(c) => {
            let raw_status = c.order_status.as_deref().unwrap_or_default();
            Notification::new(
                NotificationId::generate(),
                &c.user_id,
                &c.email,
                "Order Status Update",
                format!(
                    "Order #{} is now {}",
                    c.order_id,
                    humanize_order_status(raw_status)
                ),
                NotificationType::OrderConfirmed,
                vec![Channel::Email, Channel::WebSocket],
                Some(format!(
                    "{{\"orderId\":\"{}\",\"status\":\"{}\"}}",
                    c.order_id, raw_status
                )),
                now,
            )
        }
        NotificationEvent::PasswordResetRequest(c) => {
            let code = c.verification_code.as_deref().unwrap_or_default();
            Notification::new(
                NotificationId::generate(),
                &c.user_id,
                &c.email,
                "Código de Verificación - Recuperación de Contraseña",
                format!(
                    "Se ha solicitado un código de verificación para recuperar tu contraseña. Código: {}",
                    code
                ),
                NotificationType::SecurityPasswordReset,
                vec![Channel::Email],
                Some(format!(
                    "{{\"verificationCode\":\"{}\",\"action\":\"password_reset_request\"}}",
                    code
                )),
                now,
            )
        }
        NotificationEvent::PasswordResetVerified(c) => Notification::new(
            NotificationId::generate(),
            &c.user_id,
            &c.email,
            "Código Verificado Exitosamente",
            "Tu código de verificación ha sido validado correctamente",
            NotificationType::SecurityPasswordReset,
            vec![Channel::WebSocket],
            Some("{\"action\":\"password_reset_verified\"}".to_string()),
            now,
        ),
        NotificationEvent::PasswordResetCompleted(c) => Notification::new(
            NotificationId::generate(),
            &c.user_id,
            &c.email,
            "Contraseña Actualizada Exitosamente",
            "Tu contraseña ha sido cambiada correctamente",
            NotificationType::SecurityPasswordReset,
            vec![Channel::Email, Channel::WebSocket],
            Some("{\"action\":\"password_reset_completed\"}".to_string()),
            now,
        ),
        NotificationEvent::PaymentCompleted(c) => Notification::new(
            NotificationId::generate(),
            &c.user_id,
            &c.email,
            "Pago Completado",
            format!(
                "Tu pago de ${} para la orden #{} ha sido completado exitosamente",
                c.amount, c.order_id
            ),
            NotificationType::PaymentCompleted,
            vec![Channel::Email, Channel::WebSocket],
            Some(payment_metadata(
                &c.order_id,
                c.amount,
                &c.payment_method,
                "completed",
                c.currency.as_deref(),
            )),
            now,
        ),
        NotificationEvent::PaymentFailed(c) => Notification::new(
            NotificationId::generate(),
            &c.user_id,
            &c.email,
            "Pago Fallido",
            format!(
                "Hubo un problema con tu pago para la orden #{}. Por favor intenta nuevamente",
                c.order_id
            ),
            NotificationType::PaymentFailed,
            vec![Channel::Email, Channel::WebSocket],
            Some(payment_metadata(
                &c.order_id,
                c.amount,
                &c.payment_method,
                "failed",
                c.currency.as_deref(),
            )),
            now,
        ),
    }
}

/// Map a raw order-status token to its display phrase. Unknown tokens pass
/// through unchanged; matching is case-insensitive but the stored metadata
/// keeps the raw token verbatim.
fn humanize_order_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "confirmed" => "confirmed and in preparation".to_string(),
        "preparation" => "being prepared".to_string(),
        "ready" => "ready for pickup".to_string(),
        "delivered" => "delivered".to_string(),
        "refunded" => "refunded".to_string(),
        _ => status.to_string(),
    }
}

fn payment_metadata(
    order_id: &str,
    amount: f64,
    payment_method: &str,
    payment_status: &str,
    currency: Option<&str>,
) -> String {
    format!(
        "{{\"orderId\":\"{}\",\"amount\":{:.2},\"paymentMethod\":\"{}\",\"paymentStatus\":\"{}\",\"currency\":\"{}\"}}",
        order_id,
        amount,
        payment_method,
        payment_status,
        currency.unwrap_or("COP")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NotificationStatus;
    use crate::services::commands::{
        LoginEventCommand, OrderCommand, PasswordResetCommand, PaymentCommand,
    };
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn order_command(status: Option<&str>) -> OrderCommand {
        OrderCommand {
            user_id: "seller42".to_string(),
            email: "seller@example.com".to_string(),
            name: "Seller".to_string(),
            order_id: "ORD-77".to_string(),
            order_status: status.map(str::to_string),
            point_of_sale_id: Some("POS-9".to_string()),
        }
    }

    #[test]
    fn login_notification_rule() {
        let event = NotificationEvent::Login(LoginEventCommand {
            user_id: "user123".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            ip: "192.168.1.1".to_string(),
        });

        let n = build(&event, now());

        assert_eq!(n.title(), "Login detected");
        assert_eq!(n.message(), "Your account was accessed from IP: 192.168.1.1");
        assert_eq!(n.notification_type(), NotificationType::SecurityLogin);
        assert_eq!(n.channels(), vec![Channel::Email, Channel::WebSocket]);
        assert_eq!(n.status(), NotificationStatus::Pending);
        assert!(n.delivery_attempts().is_empty());
        assert!(n.metadata().is_none());
        assert_eq!(n.created_at(), now());
    }

    #[test]
    fn new_order_channel_order_and_metadata() {
        let event = NotificationEvent::NewOrder(order_command(None));

        let n = build(&event, now());

        assert_eq!(n.title(), "New Order Received");
        assert_eq!(n.message(), "You have a new order #ORD-77 to prepare");
        assert_eq!(n.notification_type(), NotificationType::SellerNewOrder);
        // WebSocket before Email: channel-attempt sequencing depends on it.
        assert_eq!(n.channels(), vec![Channel::WebSocket, Channel::Email]);
        let metadata = n.metadata().unwrap();
        assert!(metadata.contains("ORD-77"));
        assert!(metadata.contains("POS-9"));
    }

    #[test]
    fn order_status_change_humanizes_message_but_stores_raw_status() {
        let event = NotificationEvent::OrderStatusChange(order_command(Some("delivered")));

        let n = build(&event, now());

        assert!(n.message().contains("delivered"));
        assert!(n.metadata().unwrap().contains("\"status\":\"delivered\""));
        assert_eq!(n.channels(), vec![Channel::Email, Channel::WebSocket]);
    }

    #[test]
    fn humanize_order_status_mapping() {
        assert_eq!(
            humanize_order_status("confirmed"),
            "confirmed and in preparation"
        );
        assert_eq!(humanize_order_status("PREPARATION"), "being prepared");
        assert_eq!(humanize_order_status("Ready"), "ready for pickup");
        assert_eq!(humanize_order_status("refunded"), "refunded");
        // Unknown tokens pass through verbatim, case preserved.
        assert_eq!(humanize_order_status("On-Hold"), "On-Hold");
    }

    #[test]
    fn password_reset_request_is_email_only_with_code_metadata() {
        let event = NotificationEvent::PasswordResetRequest(PasswordResetCommand {
            user_id: "user123".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            verification_code: Some("483920".to_string()),
        });

        let n = build(&event, now());

        assert_eq!(n.channels(), vec![Channel::Email]);
        assert!(n.message().contains("483920"));
        let metadata = n.metadata().unwrap();
        assert!(metadata.contains("\"verificationCode\":\"483920\""));
        assert!(metadata.contains("\"action\":\"password_reset_request\""));
    }

    #[test]
    fn password_reset_verified_is_websocket_only() {
        let event = NotificationEvent::PasswordResetVerified(PasswordResetCommand {
            user_id: "user123".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            verification_code: None,
        });

        let n = build(&event, now());

        assert_eq!(n.title(), "Código Verificado Exitosamente");
        assert_eq!(n.channels(), vec![Channel::WebSocket]);
        assert_eq!(
            n.metadata(),
            Some("{\"action\":\"password_reset_verified\"}")
        );
    }

    #[test]
    fn payment_completed_metadata_defaults_currency_to_cop() {
        let event = NotificationEvent::PaymentCompleted(PaymentCommand {
            user_id: "user123".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            order_id: "ORD-10".to_string(),
            amount: 25000.5,
            payment_method: "credit_card".to_string(),
            currency: None,
        });

        let n = build(&event, now());

        assert_eq!(n.title(), "Pago Completado");
        assert_eq!(n.notification_type(), NotificationType::PaymentCompleted);
        let metadata = n.metadata().unwrap();
        assert!(metadata.contains("\"amount\":25000.50"));
        assert!(metadata.contains("\"paymentStatus\":\"completed\""));
        assert!(metadata.contains("\"currency\":\"COP\""));
    }

    #[test]
    fn payment_failed_keeps_explicit_currency() {
        let event = NotificationEvent::PaymentFailed(PaymentCommand {
            user_id: "user123".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            order_id: "ORD-11".to_string(),
            amount: 99.9,
            payment_method: "pse".to_string(),
            currency: Some("USD".to_string()),
        });

        let n = build(&event, now());

        assert_eq!(n.title(), "Pago Fallido");
        assert!(n.message().contains("ORD-11"));
        let metadata = n.metadata().unwrap();
        assert!(metadata.contains("\"paymentStatus\":\"failed\""));
        assert!(metadata.contains("\"currency\":\"USD\""));
    }
}
