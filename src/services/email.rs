use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::db::models::Notification;

/// Outbound mail port.
///
/// Both operations return `true` when the message was accepted for
/// delivery. A `false` return is an expected delivery failure, recorded as
/// a failed attempt by the caller; transport errors never escape this
/// boundary.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_html_email(&self, to: &str, subject: &str, html_body: &str) -> bool;

    /// Generic templated send using the notification's own title/message.
    async fn send_notification_email(&self, notification: &Notification) -> bool;
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// [`EmailSender`] backed by an HTTP mail API.
pub struct HttpEmailService {
    http: reqwest::Client,
    config: EmailConfig,
}

impl HttpEmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailService {
    async fn send_html_email(&self, to: &str, subject: &str, html_body: &str) -> bool {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) => key,
            None => {
                tracing::warn!("Email delivery disabled (no EMAIL_API_KEY); dropping message to {}", to);
                return false;
            }
        };

        let message = OutgoingMessage {
            from: &self.config.from_address,
            to,
            subject,
            html: html_body,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&message)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!("Email accepted for delivery: to={}, subject={}", to, subject);
                true
            }
            Ok(resp) => {
                tracing::warn!(
                    "Mail API rejected message to {}: status={}",
                    to,
                    resp.status()
                );
                false
            }
            Err(e) => {
                tracing::warn!("Failed to reach mail API for {}: {}", to, e);
                false
            }
        }
    }

    async fn send_notification_email(&self, notification: &Notification) -> bool {
        let html = notification_email_html(notification.title(), notification.message());
        self.send_html_email(notification.user_email(), notification.title(), &html)
            .await
    }
}

fn format_email_date(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Generic wrapper used by the templated notification email.
pub fn notification_email_html(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px; }}
        .container {{ background-color: white; padding: 30px; border-radius: 10px; max-width: 600px; margin: 0 auto; }}
        .title {{ color: #FFB44D; font-weight: bold; font-size: 24px; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <p class="title">{title}</p>
        <p>{message}</p>
        <div class="footer">
            <p>Saludos,<br>El equipo de soporte</p>
        </div>
    </div>
</body>
</html>"#
    )
}

pub fn login_email_html(name: &str, ip: &str, at: DateTime<Utc>) -> String {
    let date = format_email_date(at);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f8f9fa; padding: 20px; }}
        .container {{ background-color: white; padding: 40px; border-radius: 12px; max-width: 600px; margin: 0 auto; border-left: 5px solid #FFB44D; }}
        .header {{ color: #FFB44D; font-weight: bold; font-size: 28px; text-align: center; }}
        .security-box {{ background-color: #FFF9F0; border: 2px solid #FFB44D; border-radius: 8px; padding: 20px; margin: 20px 0; }}
        .warning {{ background-color: #FFF3E0; border-left: 4px solid #FFB44D; padding: 15px; margin: 20px 0; }}
        .footer {{ margin-top: 30px; font-size: 14px; color: #666; text-align: center; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">Actividad de Inicio de Sesión Detectada</div>
        <h2>Hola {name},</h2>
        <p>Hemos detectado un nuevo inicio de sesión en tu cuenta. Aquí están los detalles:</p>
        <div class="security-box">
            <p><strong>Dirección IP:</strong> {ip}</p>
            <p><strong>Fecha y Hora:</strong> {date}</p>
        </div>
        <div class="warning">
            <strong>¿No reconoces esta actividad?</strong>
            <p>Si no iniciaste sesión recientemente, te recomendamos cambiar tu contraseña inmediatamente y contactar a soporte.</p>
        </div>
        <p>Si realizaste este inicio de sesión, puedes ignorar este mensaje con tranquilidad.</p>
        <div class="footer">
            <p>Por tu seguridad, el equipo de soporte</p>
        </div>
    </div>
</body>
</html>"#
    )
}

pub fn password_reset_email_html(name: &str, verification_code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px; }}
        .container {{ background-color: white; padding: 30px; border-radius: 10px; max-width: 600px; margin: 0 auto; }}
        .code {{ font-size: 32px; font-weight: bold; color: #FFB44D; text-align: center; margin: 20px 0; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Hola {name},</h2>
        <p>Has solicitado recuperar tu contraseña. Usa el siguiente código de verificación:</p>
        <div class="code">{verification_code}</div>
        <p>Este código expirará en 15 minutos.</p>
        <p>Si no solicitaste este cambio, por favor ignora este mensaje.</p>
        <div class="footer">
            <p>Saludos,<br>El equipo de soporte</p>
        </div>
    </div>
</body>
</html>"#
    )
}

pub fn password_reset_completed_email_html(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px; }}
        .container {{ background-color: white; padding: 30px; border-radius: 10px; max-width: 600px; margin: 0 auto; }}
        .success {{ color: #FFB44D; font-weight: bold; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Hola {name},</h2>
        <p class="success">Tu contraseña ha sido actualizada exitosamente.</p>
        <p>Si realizaste este cambio, no necesitas hacer nada más.</p>
        <p>Si no reconoces esta actividad, por favor contacta a soporte inmediatamente.</p>
        <div class="footer">
            <p>Saludos,<br>El equipo de soporte</p>
        </div>
    </div>
</body>
</html>"#
    )
}

pub fn payment_completed_email_html(
    name: &str,
    order_id: &str,
    amount: f64,
    payment_method: &str,
    at: DateTime<Utc>,
) -> String {
    let date = format_email_date(at);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px; }}
        .container {{ background-color: white; padding: 30px; border-radius: 10px; max-width: 600px; margin: 0 auto; }}
        .success {{ color: #059669; font-weight: bold; font-size: 24px; }}
        .amount {{ font-size: 32px; font-weight: bold; color: #2563eb; text-align: center; margin: 20px 0; }}
        .details {{ background-color: #f8fafc; padding: 15px; border-radius: 5px; margin: 20px 0; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Hola {name},</h2>
        <p class="success">¡Pago Completado Exitosamente!</p>
        <div class="amount">${amount:.2}</div>
        <div class="details">
            <p><strong>Número de Orden:</strong> #{order_id}</p>
            <p><strong>Método de Pago:</strong> {payment_method}</p>
            <p><strong>Fecha:</strong> {date}</p>
        </div>
        <p>Tu pago ha sido procesado correctamente. Ahora puedes hacer seguimiento a tu orden.</p>
        <div class="footer">
            <p>Saludos,<br>El equipo de soporte</p>
        </div>
    </div>
</body>
</html>"#
    )
}

pub fn payment_failed_email_html(name: &str, order_id: &str, payment_method: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px; }}
        .container {{ background-color: white; padding: 30px; border-radius: 10px; max-width: 600px; margin: 0 auto; }}
        .error {{ color: #dc2626; font-weight: bold; font-size: 24px; }}
        .details {{ background-color: #fef2f2; padding: 15px; border-radius: 5px; margin: 20px 0; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Hola {name},</h2>
        <p class="error">Problema con tu Pago</p>
        <div class="details">
            <p><strong>Número de Orden:</strong> #{order_id}</p>
            <p><strong>Método de Pago:</strong> {payment_method}</p>
            <p>Lo sentimos, hubo un problema al procesar tu pago. Esto puede deberse a fondos insuficientes, información de la tarjeta incorrecta o problemas temporales del sistema.</p>
        </div>
        <p>Por favor intenta nuevamente o utiliza otro método de pago.</p>
        <div class="footer">
            <p>Saludos,<br>El equipo de soporte</p>
        </div>
    </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rich_bodies_embed_event_fields() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let login = login_email_html("Test User", "192.168.1.1", at);
        assert!(login.contains("Test User"));
        assert!(login.contains("192.168.1.1"));

        let reset = password_reset_email_html("Test User", "483920");
        assert!(reset.contains("483920"));

        let payment = payment_completed_email_html("Test User", "ORD-10", 25000.5, "credit_card", at);
        assert!(payment.contains("#ORD-10"));
        assert!(payment.contains("$25000.50"));
        assert!(payment.contains("credit_card"));

        let failed = payment_failed_email_html("Test User", "ORD-11", "pse");
        assert!(failed.contains("#ORD-11"));
    }

    #[test]
    fn generic_body_uses_title_and_message() {
        let html = notification_email_html("Order Status Update", "Order #42 is now delivered");
        assert!(html.contains("Order Status Update"));
        assert!(html.contains("Order #42 is now delivered"));
    }
}
