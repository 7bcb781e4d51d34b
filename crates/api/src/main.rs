use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use masthead_api::background;
use masthead_api::config::ServerConfig;
use masthead_api::notifications::NotificationRouter;
use masthead_api::router::build_app_router;
use masthead_api::state::AppState;
use masthead_events::{EmailConfig, EmailDelivery, EventBus, LogSink, NotificationSink};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "masthead_api=debug,masthead_events=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        sweeper_enabled = config.sweeper.enabled,
        cron_trigger = config.cron_secret.is_some(),
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = masthead_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    masthead_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    masthead_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus and notifications ---
    let event_bus = Arc::new(EventBus::default());

    let sink: Arc<dyn NotificationSink> = match EmailConfig::from_env() {
        Some(email_config) => Arc::new(
            EmailDelivery::new(email_config).expect("Invalid SMTP configuration"),
        ),
        None => {
            tracing::warn!("SMTP_HOST not set, author notifications go to the log only");
            Arc::new(LogSink)
        }
    };
    let notification_router =
        NotificationRouter::new(pool.clone(), sink, config.notification_timeout());
    let router_handle = tokio::spawn(notification_router.run(event_bus.subscribe()));

    // --- Background tasks ---
    let cancel = CancellationToken::new();
    let sweeper_handle = if config.sweeper.enabled {
        Some(tokio::spawn(background::scheduled_publish::run(
            pool.clone(),
            Arc::clone(&event_bus),
            config.sweeper.clone(),
            cancel.clone(),
        )))
    } else {
        tracing::info!("In-process sweeper disabled; relying on the cron trigger");
        None
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    if let Some(handle) = sweeper_handle {
        let _ = tokio::time::timeout(config.shutdown_timeout(), handle).await;
    }

    // Dropping the last sender closes the channel and stops the router.
    drop(event_bus);
    let _ = tokio::time::timeout(config.shutdown_timeout(), router_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
