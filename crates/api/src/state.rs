use std::sync::Arc;

use planner_ai::Orchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Everything here is constructed once in `main` and injected; there are no
/// module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: planner_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// AI generation orchestrator with the configured provider clients.
    pub orchestrator: Arc<Orchestrator>,
}
