use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use time::OffsetDateTime;
use tokio::time::Instant;

use super::{Code, EvaluationMode, Feedback};
use crate::error::{GameError, GameResult};

/// Unique identifier of a game
pub type GameId = String;

/// One of the two sides of a duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Always moves first
    #[serde(rename = "player_1")]
    PlayerOne,
    #[serde(rename = "player_2")]
    PlayerTwo,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::PlayerOne, Player::PlayerTwo];

    /// The other side
    pub fn opponent(self) -> Self {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
        }
    }

    fn index(self) -> usize {
        match self {
            Player::PlayerOne => 0,
            Player::PlayerTwo => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::PlayerOne => write!(f, "player_1"),
            Player::PlayerTwo => write!(f, "player_2"),
        }
    }
}

/// Game status enum
///
/// Transitions only leave `InProgress`, never return to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl GameStatus {
    /// Whether no further guesses can ever be recorded
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// A guess accepted into a player's buffer, not yet scored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGuess {
    pub code: Code,
    pub comment: Option<String>,
    pub player: Player,
}

/// A scored guess recorded in the game history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub code: Code,
    /// Scored against the opponent of `player`
    pub feedback: Feedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub player: Player,
}

/// Number of guesses waiting in each player's buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCounts {
    pub player_1: usize,
    pub player_2: usize,
}

/// Manages the state of a single duel
#[derive(Debug)]
pub struct GameState {
    /// Unique identifier for this game
    pub game_id: GameId,
    /// Current game status
    pub status: GameStatus,
    /// Whose buffered guess is processed next; None once the game is cancelled
    pub waiting_for_player: Option<Player>,
    /// Set when the game completes
    pub winner: Option<Player>,
    /// Code player 2 is trying to break
    pub player_1_secret: Code,
    /// Code player 1 is trying to break
    pub player_2_secret: Code,
    /// Monotonic creation instant, used for expiry
    pub created_at: Instant,
    /// Wall-clock creation time, for display
    pub created_at_utc: OffsetDateTime,
    /// Scored guesses in processing order
    history: Vec<Guess>,
    /// Per-player FIFO of guesses submitted ahead of turn
    buffers: [VecDeque<PendingGuess>; 2],
}

impl GameState {
    /// Create a new game where player 1 moves first
    ///
    /// # Arguments
    ///
    /// * `game_id` - Unique identifier for this game
    /// * `player_1_secret` - Player 1's secret code
    /// * `player_2_secret` - Player 2's secret code
    pub fn new(game_id: GameId, player_1_secret: Code, player_2_secret: Code) -> Self {
        Self {
            game_id,
            status: GameStatus::InProgress,
            waiting_for_player: Some(Player::PlayerOne),
            winner: None,
            player_1_secret,
            player_2_secret,
            created_at: Instant::now(),
            created_at_utc: OffsetDateTime::now_utc(),
            history: Vec::new(),
            buffers: [VecDeque::new(), VecDeque::new()],
        }
    }

    /// Secret code owned by `player`
    pub fn secret_of(&self, player: Player) -> &Code {
        match player {
            Player::PlayerOne => &self.player_1_secret,
            Player::PlayerTwo => &self.player_2_secret,
        }
    }

    pub fn history(&self) -> &[Guess] {
        &self.history
    }

    /// Number of guesses buffered for `player`
    pub fn pending(&self, player: Player) -> usize {
        self.buffers[player.index()].len()
    }

    /// The player to move, if the game accepts guesses
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the game is finished or the turn is unset
    pub fn current_turn(&self) -> GameResult<Player> {
        if self.status != GameStatus::InProgress {
            return Err(GameError::invalid_state(
                &self.game_id,
                format!("game is {:?}", self.status).to_lowercase(),
            ));
        }

        self.waiting_for_player.ok_or_else(|| {
            GameError::invalid_state(&self.game_id, "game is not waiting for any player")
        })
    }

    /// Append a guess to its player's buffer
    ///
    /// Guesses are accepted regardless of whose turn it is.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the game no longer accepts guesses; nothing is buffered then
    pub fn enqueue(&mut self, guess: PendingGuess) -> GameResult<()> {
        self.current_turn()?;
        self.buffers[guess.player.index()].push_back(guess);
        Ok(())
    }

    /// Score and record the next buffered guess of the player to move
    ///
    /// # Returns
    ///
    /// The recorded guess, or None if the game is over or that player's buffer is empty
    pub fn apply_next(&mut self, mode: EvaluationMode) -> Option<&Guess> {
        if self.status != GameStatus::InProgress {
            return None;
        }

        let player = self.waiting_for_player?;
        let pending = self.buffers[player.index()].pop_front()?;

        let target = *self.secret_of(player.opponent());
        let feedback = mode.evaluate(&pending.code, &target);

        self.history.push(Guess {
            code: pending.code,
            feedback,
            comment: pending.comment,
            player,
        });
        self.waiting_for_player = Some(player.opponent());

        if pending.code == target {
            self.status = GameStatus::Completed;
            self.winner = Some(player);
        }

        self.history.last()
    }

    /// Cancel the game, discarding any buffered guesses
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the game has already finished
    pub fn cancel(&mut self) -> GameResult<()> {
        if self.status.is_terminal() {
            return Err(GameError::invalid_state(
                &self.game_id,
                "game has already finished",
            ));
        }

        self.status = GameStatus::Cancelled;
        self.waiting_for_player = None;
        for buffer in self.buffers.iter_mut() {
            buffer.clear();
        }
        Ok(())
    }

    /// Immutable copy of the observable state
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.game_id.clone(),
            status: self.status,
            waiting_for_player: self.waiting_for_player,
            winner: self.winner,
            player_1_secret: self.player_1_secret,
            player_2_secret: self.player_2_secret,
            history: self.history.clone(),
            pending: PendingCounts {
                player_1: self.pending(Player::PlayerOne),
                player_2: self.pending(Player::PlayerTwo),
            },
            created_at: self.created_at_utc.unix_timestamp(),
        }
    }
}

/// State published to subscribers after every recorded guess
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub status: GameStatus,
    pub waiting_for_player: Option<Player>,
    pub winner: Option<Player>,
    pub player_1_secret: Code,
    pub player_2_secret: Code,
    pub history: Vec<Guess>,
    pub pending: PendingCounts,
    /// Unix timestamp (seconds)
    pub created_at: i64,
}

impl GameSnapshot {
    /// Most recent guess recorded for `player`
    pub fn last_guess_of(&self, player: Player) -> Option<&Guess> {
        self.history.iter().rev().find(|g| g.player == player)
    }

    /// Copy with both secrets replaced by None while the game is running
    pub fn public_view(&self) -> serde_json::Value {
        let reveal = self.status.is_terminal();
        serde_json::json!({
            "game_id": self.game_id,
            "status": self.status,
            "waiting_for_player": self.waiting_for_player,
            "winner": self.winner,
            "player_1_secret": reveal.then_some(self.player_1_secret),
            "player_2_secret": reveal.then_some(self.player_2_secret),
            "history": self.history,
            "pending": self.pending,
            "created_at": self.created_at,
        })
    }
}
