use std::sync::Arc;

use crate::db::models::{Channel, Notification};
use crate::db::repository::NotificationStore;
use crate::error::{AppError, AppResult};
use crate::services::clock::Clock;
use crate::services::commands::{
    LoginEventCommand, NotificationEvent, OrderCommand, PasswordResetCommand, PaymentCommand,
};
use crate::services::email::{self, EmailSender};
use crate::services::factory;
use crate::services::realtime::RealtimeEmitter;

/// How the email leg of an event's channel plan is carried out.
enum EmailPlan {
    /// Kind-specific subject and rich HTML body built from event data.
    Rich { subject: String, html: String },
    /// Generic templated send using the notification's own title/message.
    Templated,
}

/// Delivery orchestrator: factory → persist → deliver → re-persist → emit.
///
/// Stateless between calls; every invocation handles one event command.
/// The notification is saved before the email attempt so a concurrent
/// reader always sees a previously-committed state (PENDING, then
/// SENT/FAILED) — the email send is an uncontrolled external side effect
/// and cannot be rolled back, so it sits outside any transaction.
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    mailer: Arc<dyn EmailSender>,
    emitter: Arc<dyn RealtimeEmitter>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        mailer: Arc<dyn EmailSender>,
        emitter: Arc<dyn RealtimeEmitter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            mailer,
            emitter,
            clock,
        }
    }

    pub async fn process_successful_login(
        &self,
        command: LoginEventCommand,
    ) -> AppResult<Notification> {
        self.process(NotificationEvent::Login(command)).await
    }

    pub async fn process_new_order(&self, command: OrderCommand) -> AppResult<Notification> {
        self.process(NotificationEvent::NewOrder(command)).await
    }

    pub async fn process_order_status_change(
        &self,
        command: OrderCommand,
    ) -> AppResult<Notification> {
        self.process(NotificationEvent::OrderStatusChange(command))
            .await
    }

    pub async fn process_password_reset_request(
        &self,
        command: PasswordResetCommand,
    ) -> AppResult<Notification> {
        self.process(NotificationEvent::PasswordResetRequest(command))
            .await
    }

    pub async fn process_password_reset_verified(
        &self,
        command: PasswordResetCommand,
    ) -> AppResult<Notification> {
        self.process(NotificationEvent::PasswordResetVerified(command))
            .await
    }

    pub async fn process_password_reset_completed(
        &self,
        command: PasswordResetCommand,
    ) -> AppResult<Notification> {
        self.process(NotificationEvent::PasswordResetCompleted(command))
            .await
    }

    pub async fn process_payment_completed(
        &self,
        command: PaymentCommand,
    ) -> AppResult<Notification> {
        self.process(NotificationEvent::PaymentCompleted(command))
            .await
    }

    pub async fn process_payment_failed(
        &self,
        command: PaymentCommand,
    ) -> AppResult<Notification> {
        self.process(NotificationEvent::PaymentFailed(command)).await
    }

    /// Single dispatch shared by every event kind. Any collaborator
    /// failure aborts the sequence and surfaces as a processing error
    /// wrapping the cause; no partial retry happens here.
    pub async fn process(&self, event: NotificationEvent) -> AppResult<Notification> {
        let kind = event.kind();
        self.run_delivery(event)
            .await
            .map_err(|e| AppError::processing(kind, e))
    }

    async fn run_delivery(&self, event: NotificationEvent) -> AppResult<Notification> {
        tracing::info!(
            "Processing {} event for user {}",
            event.kind(),
            event.user_id()
        );

        let notification = factory::build(&event, self.clock.now());
        let mut saved = self.store.save(&notification).await?;

        if let Some(plan) = self.email_plan(&event) {
            let successful = match plan {
                EmailPlan::Rich { subject, html } => {
                    self.mailer
                        .send_html_email(event.email(), &subject, &html)
                        .await
                }
                EmailPlan::Templated => self.mailer.send_notification_email(&saved).await,
            };

            saved.add_delivery_attempt(
                Channel::Email,
                successful,
                if successful {
                    None
                } else {
                    Some("Error sending email".to_string())
                },
                self.clock.now(),
            );
            saved = self.store.save(&saved).await?;
        }

        // Snapshot emission happens regardless of the email outcome.
        self.emitter
            .emit_user_notification(event.user_id(), &saved)
            .await;

        tracing::info!(
            "{} notification processed successfully: {}",
            event.kind(),
            saved.id()
        );

        Ok(saved)
    }

    /// Kinds with an EMAIL channel in their rule get an email leg; the
    /// web-socket-only kinds (new order, password-reset-verified) skip it
    /// and stay PENDING for this call.
    fn email_plan(&self, event: &NotificationEvent) -> Option<EmailPlan> {
        match event {
            NotificationEvent::Login(c) => Some(EmailPlan::Rich {
                subject: "Nueva Actividad de Inicio de Sesión".to_string(),
                html: email::login_email_html(&c.name, &c.ip, self.clock.now()),
            }),
            NotificationEvent::NewOrder(_) => None,
            NotificationEvent::OrderStatusChange(_) => Some(EmailPlan::Templated),
            NotificationEvent::PasswordResetRequest(c) => Some(EmailPlan::Rich {
                subject: "Código de Verificación - Recuperación de Contraseña".to_string(),
                html: email::password_reset_email_html(
                    &c.name,
                    c.verification_code.as_deref().unwrap_or_default(),
                ),
            }),
            NotificationEvent::PasswordResetVerified(_) => None,
            NotificationEvent::PasswordResetCompleted(c) => Some(EmailPlan::Rich {
                subject: "Contraseña Actualizada Exitosamente".to_string(),
                html: email::password_reset_completed_email_html(&c.name),
            }),
            NotificationEvent::PaymentCompleted(c) => Some(EmailPlan::Rich {
                subject: format!("Pago Completado Exitosamente - Orden #{}", c.order_id),
                html: email::payment_completed_email_html(
                    &c.name,
                    &c.order_id,
                    c.amount,
                    &c.payment_method,
                    self.clock.now(),
                ),
            }),
            NotificationEvent::PaymentFailed(c) => Some(EmailPlan::Rich {
                subject: format!("Problema con tu Pago - Orden #{}", c.order_id),
                html: email::payment_failed_email_html(&c.name, &c.order_id, &c.payment_method),
            }),
        }
    }
}
