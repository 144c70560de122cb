use std::sync::Arc;

use crate::{config::Config, engine::GameEngine, middleware::RateLimiter};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GameEngine>,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            engine: Arc::new(GameEngine::new(config.engine_settings())),
            config: Arc::new(config),
            rate_limiter: RateLimiter::new(),
        }
    }
}
