use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{models::HealthResponse, state::AppState};

/// Health check endpoint
///
/// # Returns
///
/// JSON response with status, build version and the number of live games
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let games = state.engine.stats().await.total_games;

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.config.environment.clone(),
            evaluation_mode: state.engine.mode(),
            games,
        }),
    )
}
