pub mod clock;
pub mod commands;
pub mod email;
pub mod factory;
pub mod init;
pub mod notifications;
pub mod queries;
pub mod realtime;

pub use clock::{Clock, SystemClock};
pub use commands::{
    LoginEventCommand, NotificationEvent, OrderCommand, PasswordResetCommand, PaymentCommand,
};
pub use email::{EmailSender, HttpEmailService};
pub use notifications::NotificationService;
pub use queries::{NotificationQueryService, NotificationResponse};
pub use realtime::{RealtimeEmitter, WebSocketHub};
