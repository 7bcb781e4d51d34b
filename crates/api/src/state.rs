use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub pool: masthead_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Workflow events are published here after each committed mutation.
    pub event_bus: Arc<masthead_events::EventBus>,
}
