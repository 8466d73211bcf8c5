//! Content generation endpoint

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use museai_common::api::GenerateRequest;
use serde_json::Value;
use tracing::info;

use crate::models::GenerateResponse;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/generate
///
/// Body: `{quantity?, content_types?, customization?}`. Malformed fields
/// fall back to their defaults. A body that is not JSON at all (empty
/// included) is a client error: 400 with the usual `{success: false,
/// error}` body, rather than the 500 used for generation failures.
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<GenerateResponse>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("body is not valid JSON: {}", e)))?;
    let request = GenerateRequest::from_json(&value);

    let types: Vec<&str> = request.content_types.iter().map(|t| t.as_str()).collect();
    info!(
        "Generate request: quantity {}, content types [{}]",
        request.quantity,
        types.join(", ")
    );

    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::task::spawn_blocking(move || orchestrator.run(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("generation task failed: {}", e)))?;

    match outcome {
        Ok(outcome) => Ok(Json(GenerateResponse {
            success: true,
            results: outcome.records,
            evolution_score: outcome.evolution_score,
        })),
        Err(e) => {
            *state.last_error.write().await = Some(e.to_string());
            Err(e.into())
        }
    }
}

pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/api/generate", post(generate))
}
