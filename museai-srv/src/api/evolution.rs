//! Evolution statistics endpoints

use axum::{extract::State, routing::get, Json, Router};

use crate::evolution::{EvolutionSnapshot, Recommendations};
use crate::{ApiResult, AppState};

/// GET /api/evolution-stats
pub async fn evolution_stats(State(state): State<AppState>) -> ApiResult<Json<EvolutionSnapshot>> {
    Ok(Json(state.evolution().snapshot()?))
}

/// GET /api/recommendations
///
/// Preferred genre and mood as of the last recompute, plus the most
/// requested tempo. Fields with no data yet are omitted.
pub async fn recommendations(State(state): State<AppState>) -> ApiResult<Json<Recommendations>> {
    Ok(Json(state.evolution().recommendations()?))
}

pub fn evolution_routes() -> Router<AppState> {
    Router::new()
        .route("/api/evolution-stats", get(evolution_stats))
        .route("/api/recommendations", get(recommendations))
}
