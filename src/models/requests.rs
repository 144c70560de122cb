use serde::{Deserialize, Serialize};

use crate::{
    core::{Code, EvaluationMode, Player, MAX_COMMENT_LENGTH},
    error::GameError,
};

/// Request to create a player-vs-player game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Player 1's secret; random if omitted
    #[serde(default)]
    pub secret_1: Option<String>,
    /// Player 2's secret; random if omitted
    #[serde(default)]
    pub secret_2: Option<String>,
}

impl CreateGameRequest {
    /// Parse both secrets
    ///
    /// # Returns
    ///
    /// The parsed secrets, or a validation error naming the faulty one
    pub fn secrets(&self) -> Result<(Option<Code>, Option<Code>), GameError> {
        Ok((
            parse_optional_secret(self.secret_1.as_deref(), "secret_1")?,
            parse_optional_secret(self.secret_2.as_deref(), "secret_2")?,
        ))
    }
}

/// Request to play against the automated guesser
///
/// The human is player 1; the guesser plays player 2 and tries to find
/// `secret`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VsAiRequest {
    #[serde(default)]
    pub secret: Option<String>,
}

impl VsAiRequest {
    pub fn secret(&self) -> Result<Option<Code>, GameError> {
        parse_optional_secret(self.secret.as_deref(), "secret")
    }
}

/// Guess submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    pub code: String,
    #[serde(default = "default_player")]
    pub player: Player,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_player() -> Player {
    Player::PlayerOne
}

impl GuessRequest {
    pub fn code(&self) -> Result<Code, GameError> {
        Code::parse(&self.code)
    }

    /// Clean and validate the comment
    ///
    /// # Returns
    ///
    /// Trimmed comment, `None` if it was blank, error if too long
    pub fn validate_comment(comment: Option<&str>) -> Result<Option<String>, GameError> {
        let Some(cleaned) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(None);
        };

        if cleaned.chars().count() > MAX_COMMENT_LENGTH {
            return Err(GameError::Validation(format!(
                "Comment must be {} characters or less",
                MAX_COMMENT_LENGTH
            )));
        }

        Ok(Some(cleaned.to_string()))
    }
}

/// Ad-hoc scoring of a guess against a secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub guess: String,
    pub secret: String,
    /// Defaults to the server's evaluation mode
    #[serde(default)]
    pub mode: Option<EvaluationMode>,
}

impl EvaluateRequest {
    pub fn codes(&self) -> Result<(Code, Code), GameError> {
        Ok((
            with_field("guess", Code::parse(&self.guess))?,
            with_field("secret", Code::parse(&self.secret))?,
        ))
    }
}

fn parse_optional_secret(input: Option<&str>, field: &str) -> Result<Option<Code>, GameError> {
    input
        .map(|s| with_field(field, Code::parse(s)))
        .transpose()
}

fn with_field(field: &str, result: Result<Code, GameError>) -> Result<Code, GameError> {
    result.map_err(|e| match e {
        GameError::Validation(msg) => GameError::Validation(format!("{}: {}", field, msg)),
        other => other,
    })
}
