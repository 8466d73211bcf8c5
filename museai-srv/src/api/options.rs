//! Customization options endpoint

use axum::{routing::get, Json, Router};
use museai_common::api::CustomizationOptions;

use crate::AppState;

/// GET /api/customization-options
///
/// Every accepted value of each customization field.
pub async fn customization_options() -> Json<CustomizationOptions> {
    Json(CustomizationOptions::all())
}

pub fn option_routes() -> Router<AppState> {
    Router::new().route("/api/customization-options", get(customization_options))
}
