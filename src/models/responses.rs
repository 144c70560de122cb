use serde::{Deserialize, Serialize};

use crate::core::{
    Code, EvaluationMode, Feedback, GameSnapshot, GameStats, GameStatus, Player,
};

/// Game creation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCreatedResponse {
    pub game_id: String,
    pub status: GameStatus,
    pub waiting_for_player: Option<Player>,
    /// Unix seconds
    pub created_at: i64,
    /// Name of the automated opponent, for games against one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
}

impl GameCreatedResponse {
    pub fn from_snapshot(snapshot: &GameSnapshot, opponent: Option<String>) -> Self {
        Self {
            game_id: snapshot.game_id.clone(),
            status: snapshot.status,
            waiting_for_player: snapshot.waiting_for_player,
            created_at: snapshot.created_at,
            opponent,
        }
    }
}

/// Result of a guess submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessAcceptedResponse {
    pub game_id: String,
    /// Guesses moved from the buffers into history by this submission
    pub recorded: usize,
    /// Game state after the submission, secrets hidden while in progress
    pub state: serde_json::Value,
}

/// Result of an ad-hoc evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub guess: Code,
    pub secret: Code,
    pub mode: EvaluationMode,
    pub feedback: Feedback,
    /// Shared digits regardless of position
    pub matches: u8,
}

impl EvaluateResponse {
    pub fn new(guess: Code, secret: Code, mode: EvaluationMode) -> Self {
        let feedback = mode.evaluate(&guess, &secret);
        Self {
            guess,
            secret,
            mode,
            matches: feedback.matches(),
            feedback,
        }
    }
}

/// Liveness report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub evaluation_mode: EvaluationMode,
    /// Games currently held in memory, whatever their status
    pub games: usize,
}

/// Server-wide counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub games: GameStats,
    pub evaluation_mode: EvaluationMode,
}
