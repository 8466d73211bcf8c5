//! museai-srv library interface
//!
//! Exposes the router, application state and services so integration
//! tests can drive the API without binding a socket.

pub mod api;
pub mod error;
pub mod evolution;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::evolution::EvolutionHandle;
use crate::services::Orchestrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Generation workflow (owns the artifact store)
    pub orchestrator: Arc<Orchestrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last failed request, reported by /health
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub fn evolution(&self) -> &EvolutionHandle {
        self.orchestrator.evolution()
    }
}

/// Build application router
///
/// Generated files are served read-only under `/output`. CORS is permissive
/// so a browser front end on another origin can call the API.
pub fn build_router(state: AppState) -> Router {
    let output = ServeDir::new(state.orchestrator.artifacts().root());

    Router::new()
        .merge(api::generate_routes())
        .merge(api::option_routes())
        .merge(api::evolution_routes())
        .merge(api::health_routes())
        .nest_service("/output", output)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
