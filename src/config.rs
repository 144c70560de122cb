use anyhow::{Context, Result};
use std::time::Duration;

use crate::{
    core::{
        EvaluationMode, CLEANUP_INTERVAL_SECONDS, GAME_TTL_SECONDS, GUESSER_MAX_ATTEMPTS,
        MAX_GAME_TTL_SECONDS,
    },
    engine::EngineSettings,
    guessers::GuesserStrategy,
};

/// Server configuration, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// "development" or "production"
    pub environment: String,
    pub port: u16,
    pub game_ttl: Duration,
    pub cleanup_interval: Duration,
    /// Guesses an automated player may make in one game
    pub guesser_max_attempts: usize,
    pub guesser_strategy: GuesserStrategy,
    pub evaluation_mode: EvaluationMode,
    /// CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            port: 8000,
            game_ttl: Duration::from_secs(GAME_TTL_SECONDS),
            cleanup_interval: Duration::from_secs(CLEANUP_INTERVAL_SECONDS),
            guesser_max_attempts: GUESSER_MAX_ATTEMPTS,
            guesser_strategy: GuesserStrategy::default(),
            evaluation_mode: EvaluationMode::default(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    ///
    /// Unset variables fall back to their defaults; set but malformed ones
    /// are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);

        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .context("PORT must be a port number")?,
            None => defaults.port,
        };

        let game_ttl = match lookup("GAME_TTL_SECONDS") {
            Some(v) => {
                let secs = v
                    .trim()
                    .parse::<u64>()
                    .context("GAME_TTL_SECONDS must be a number of seconds")?;
                anyhow::ensure!(
                    secs <= MAX_GAME_TTL_SECONDS,
                    "GAME_TTL_SECONDS must be at most {}",
                    MAX_GAME_TTL_SECONDS
                );
                Duration::from_secs(secs)
            }
            None => defaults.game_ttl,
        };

        let cleanup_interval = match lookup("CLEANUP_INTERVAL_SECONDS") {
            Some(v) => {
                let secs = v
                    .trim()
                    .parse::<u64>()
                    .context("CLEANUP_INTERVAL_SECONDS must be a number of seconds")?;
                anyhow::ensure!(secs > 0, "CLEANUP_INTERVAL_SECONDS must be positive");
                Duration::from_secs(secs)
            }
            None => defaults.cleanup_interval,
        };

        let guesser_max_attempts = match lookup("GUESSER_MAX_ATTEMPTS") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .context("GUESSER_MAX_ATTEMPTS must be a number")?,
            None => defaults.guesser_max_attempts,
        };

        let guesser_strategy = match lookup("GUESSER_STRATEGY") {
            Some(v) => v.parse::<GuesserStrategy>().map_err(anyhow::Error::msg)?,
            None => defaults.guesser_strategy,
        };

        let evaluation_mode = match lookup("EVALUATION_MODE") {
            Some(v) => v.parse::<EvaluationMode>().map_err(anyhow::Error::msg)?,
            None => defaults.evaluation_mode,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment,
            port,
            game_ttl,
            cleanup_interval,
            guesser_max_attempts,
            guesser_strategy,
            evaluation_mode,
            allowed_origins,
        })
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment.as_str(), "development" | "dev")
    }

    /// Default tracing filter for this environment
    pub fn log_filter(&self) -> &'static str {
        if self.is_development() {
            "codebreaker=debug,tower_http=info"
        } else {
            "codebreaker=info,tower_http=warn"
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            mode: self.evaluation_mode,
            game_ttl: self.game_ttl,
            cleanup_interval: self.cleanup_interval,
        }
    }
}
