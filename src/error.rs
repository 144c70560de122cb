use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Errors raised by the game engine to the caller of an operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// No game with this id exists (or it has already been swept)
    #[error("game {game_id} not found")]
    NotFound { game_id: String },

    /// The game's status or turn state forbids the operation
    #[error("game {game_id} is in an invalid state: {reason}")]
    InvalidState { game_id: String, reason: String },

    /// Malformed code, secret or request field
    #[error("validation error: {0}")]
    Validation(String),
}

impl GameError {
    pub fn not_found(game_id: impl Into<String>) -> Self {
        Self::NotFound {
            game_id: game_id.into(),
        }
    }

    pub fn invalid_state(game_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            game_id: game_id.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status code used when this error reaches a route handler
    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::NotFound { .. } => StatusCode::NOT_FOUND,
            GameError::InvalidState { .. } => StatusCode::CONFLICT,
            GameError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Result alias for engine operations
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        assert_eq!(
            GameError::not_found("abc").to_string(),
            "game abc not found"
        );
        assert_eq!(
            GameError::invalid_state("abc", "game is completed").to_string(),
            "game abc is in an invalid state: game is completed"
        );
        assert_eq!(
            GameError::Validation("bad code".to_string()).to_string(),
            "validation error: bad code"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GameError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            GameError::invalid_state("x", "y").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GameError::Validation("z".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = GameError::not_found("x").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
