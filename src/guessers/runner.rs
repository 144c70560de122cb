//! Drives a guesser through a game as one of the two players.

use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::Guesser;
use crate::{
    core::{Player, GUESSER_MAX_ERRORS},
    engine::GameEngine,
    error::{GameError, GameResult},
};

/// Why a guesser stopped playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The game reached a terminal status
    GameFinished,
    /// The attempt budget was used up
    MaxAttempts,
    /// The guesser returned no guess
    GaveUp,
    /// The guesser failed more than the tolerated number of times
    TooManyErrors,
    /// The game disappeared (swept or removed)
    GameRemoved,
}

impl StopReason {
    /// True when the guesser left a game that was still running
    pub fn abandons_game(self) -> bool {
        matches!(
            self,
            StopReason::MaxAttempts | StopReason::GaveUp | StopReason::TooManyErrors
        )
    }
}

/// Summary of one guesser run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuesserOutcome {
    pub reason: StopReason,
    /// Guesses submitted
    pub attempts: usize,
    /// Guesser errors encountered
    pub errors: usize,
    /// Winner, if the game completed while the guesser was attached
    pub winner: Option<Player>,
}

/// Play `player`'s side of a game with `guesser`
///
/// The guesser only moves when the game is waiting for `player`, so its
/// guesses are never buffered ahead of turn and every guess gets its
/// feedback before the next one is produced.
///
/// # Errors
///
/// Returns `NotFound` if the game does not exist when the run starts
pub async fn run_guesser<G: Guesser + ?Sized>(
    engine: &GameEngine,
    game_id: &str,
    player: Player,
    guesser: &mut G,
    max_attempts: usize,
) -> GameResult<GuesserOutcome> {
    let mut subscription = engine.subscribe(game_id).await?;
    let mut attempts = 0;
    let mut errors = 0;

    let outcome = |reason, attempts, errors, winner| GuesserOutcome {
        reason,
        attempts,
        errors,
        winner,
    };

    while let Some(snapshot) = subscription.next().await {
        if snapshot.status.is_terminal() {
            return Ok(outcome(
                StopReason::GameFinished,
                attempts,
                errors,
                snapshot.winner,
            ));
        }

        if snapshot.waiting_for_player != Some(player) {
            continue;
        }

        if attempts >= max_attempts {
            tracing::info!(
                "Guesser {} reached {} attempts in game {}",
                guesser.name(),
                max_attempts,
                game_id
            );
            return Ok(outcome(StopReason::MaxAttempts, attempts, errors, None));
        }

        let code = loop {
            match guesser.next_guess().await {
                Ok(Some(code)) => break code,
                Ok(None) => {
                    tracing::info!("Guesser {} gave up in game {}", guesser.name(), game_id);
                    return Ok(outcome(StopReason::GaveUp, attempts, errors, None));
                }
                Err(e) => {
                    errors += 1;
                    tracing::warn!("Guesser {} failed: {}", guesser.name(), e);
                    if errors > GUESSER_MAX_ERRORS {
                        return Ok(outcome(StopReason::TooManyErrors, attempts, errors, None));
                    }
                }
            }
        };

        attempts += 1;
        let state = match engine
            .submit_guess(game_id, code, player, Some(guesser.name().to_string()))
            .await
        {
            Ok(submission) => submission.snapshot,
            // Cancelled between the snapshot and the submit
            Err(GameError::InvalidState { .. }) => {
                return Ok(outcome(StopReason::GameFinished, attempts, errors, None));
            }
            Err(GameError::NotFound { .. }) => {
                return Ok(outcome(StopReason::GameRemoved, attempts, errors, None));
            }
            Err(e) => return Err(e),
        };

        if let Some(recorded) = state.last_guess_of(player) {
            guesser.accept_feedback(recorded.feedback).await;
        }
    }

    Ok(outcome(StopReason::GameRemoved, attempts, errors, None))
}

/// Run a guesser in the background, logging its outcome
///
/// If the guesser stops while the game is still running, the game is
/// cancelled so the other player's subscriptions end.
pub fn spawn_guesser(
    engine: Arc<GameEngine>,
    game_id: String,
    player: Player,
    mut guesser: Box<dyn Guesser>,
    max_attempts: usize,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome =
            match run_guesser(&engine, &game_id, player, guesser.as_mut(), max_attempts).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("Guesser could not join game {}: {}", game_id, e);
                    return;
                }
            };

        tracing::info!(
            "Guesser {} finished game {}: {:?} after {} attempts",
            guesser.name(),
            game_id,
            outcome.reason,
            outcome.attempts
        );

        if outcome.reason.abandons_game() {
            // The opponent would otherwise wait for a move that never comes
            match engine.cancel_game(&game_id).await {
                Ok(()) => tracing::info!(
                    "Cancelled game {} after guesser {} stopped",
                    game_id,
                    guesser.name()
                ),
                Err(e) => tracing::debug!("Game {} not cancelled: {}", game_id, e),
            }
        }
    })
}
