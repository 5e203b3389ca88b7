use std::sync::Arc;

use eventhub_core::event_service::EventService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (comments, health check).
    pub pool: eventhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event validation and update controller.
    pub events: Arc<EventService>,
}
