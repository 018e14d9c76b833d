use std::sync::Arc;

use axum::{routing::get, Router};
use http::HeaderValue;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod routes;
mod services;

use config::Config;
use db::NotificationRepository;
use services::{
    HttpEmailService, NotificationQueryService, NotificationService, SystemClock, WebSocketHub,
};

pub struct AppState {
    pub notifications: NotificationService,
    pub queries: NotificationQueryService,
    pub hub: Arc<WebSocketHub>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketplace_notifications=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Marketplace Notifications Service");

    // Initialize database
    let pool = services::init::init_db(&config).await?;

    // Wire the delivery collaborators behind their ports
    let repository = Arc::new(NotificationRepository::new(pool));
    let hub = Arc::new(WebSocketHub::new());
    let clock = Arc::new(SystemClock);
    let mailer = Arc::new(HttpEmailService::new(config.email.clone()));

    let notifications = NotificationService::new(
        repository.clone(),
        mailer,
        hub.clone(),
        clock.clone(),
    );
    let queries = NotificationQueryService::new(repository, clock);

    let app_state = Arc::new(AppState {
        notifications,
        queries,
        hub,
    });

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))
        // Inbound domain events
        .nest("/api/events", routes::events::router())
        // Notification queries and read-state transitions
        .nest("/api/notifications", routes::notifications::router())
        // Real-time notification stream
        .nest("/ws", routes::ws::router())
        // Add shared state
        .with_state(app_state)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(
                    config
                        .server
                        .frontend_url
                        .parse::<HeaderValue>()
                        .expect("Invalid FRONTEND_URL for CORS"),
                )
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::DELETE,
                    http::Method::PATCH,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]),
        );

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to bind SIGTERM");
        tokio::select! {
            _ = ctrl_c => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("Failed to bind Ctrl+C");
    }

    tracing::info!("Shutdown signal received");
}
