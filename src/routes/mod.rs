pub mod game;
pub mod health;
pub mod stream;
pub mod websocket;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, middleware::rate_limit_middleware, state::AppState};

/// Build the CORS layer for the configured origins
pub fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

/// Build router with all routes
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/stats", get(game::stats))
        .route("/api/evaluate", post(game::evaluate))
        // Game creation
        .route("/api/games", post(game::create_game))
        .route("/api/games/vs-ai", post(game::create_vs_ai_game))
        // Gameplay
        .route("/api/games/:game_id", get(game::get_game))
        .route("/api/games/:game_id/guess", post(game::submit_guess))
        .route("/api/games/:game_id/cancel", post(game::cancel_game))
        // Update streams
        .route("/api/games/:game_id/updates", get(stream::game_updates))
        .route("/ws/:game_id", get(websocket::websocket_handler))
        // Add middleware layers (applied in reverse order)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.rate_limiter.clone(),
                    rate_limit_middleware,
                ))
                .layer(cors)
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}
