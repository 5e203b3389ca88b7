use std::net::SocketAddr;
use std::sync::Arc;

use eventhub_core::event_service::EventService;
use eventhub_core::event_store::{EventStore, MemoryEventStore};
use eventhub_db::event_store::PgEventStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventhub_api::config::{EventStoreKind, ServerConfig};
use eventhub_api::router::build_app_router;
use eventhub_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventhub_api=debug,eventhub_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        event_store = ?config.event_store,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let (pool, store) = match config.event_store {
        EventStoreKind::Postgres => {
            let pool = eventhub_db::create_pool(&database_url, config.storage_timeout())
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            eventhub_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            eventhub_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool.clone()));
            (pool, store)
        }
        EventStoreKind::Memory => {
            let pool = eventhub_db::create_lazy_pool(&database_url, config.storage_timeout())
                .expect("Invalid DATABASE_URL");
            tracing::warn!("Events are held in memory and will not survive a restart");
            let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());
            (pool, store)
        }
    };

    // --- App state ---
    let events = Arc::new(EventService::new(store, config.storage_timeout()));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        events,
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

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
