use std::sync::Arc;

use crate::{
    core::{
        BroadcastHub, Code, EvaluationMode, GameHandle, GameSnapshot, GameStore, PendingGuess,
        Player,
    },
    error::GameResult,
};

/// Result of one accepted guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Number of guesses recorded by the call, buffered ones included
    pub recorded: usize,
    /// State of the game when the call released the lock
    pub snapshot: GameSnapshot,
}

/// Buffers guesses per player and records them in strict turn order
///
/// All mutation of a game happens inside that game's lock: the buffer
/// append and the drain that follows form one critical section, and every
/// snapshot is published before the lock is released.
#[derive(Debug, Clone)]
pub struct TurnSequencer {
    store: Arc<GameStore>,
    hub: Arc<BroadcastHub>,
    mode: EvaluationMode,
}

impl TurnSequencer {
    pub fn new(store: Arc<GameStore>, hub: Arc<BroadcastHub>, mode: EvaluationMode) -> Self {
        Self { store, hub, mode }
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Accept a guess and drain every buffered guess that is now playable
    ///
    /// A guess submitted ahead of turn is held in the player's buffer and
    /// recorded once the opponent has moved, in submission order.
    ///
    /// # Arguments
    ///
    /// * `game_id` - The game's unique identifier
    /// * `code` - The guessed code
    /// * `player` - Who is guessing
    /// * `comment` - Optional free-form note stored with the guess
    ///
    /// # Returns
    ///
    /// Number of guesses recorded by this call and the resulting state
    ///
    /// # Errors
    ///
    /// `NotFound` if the game does not exist, `InvalidState` if it no longer accepts guesses
    pub async fn submit_guess(
        &self,
        game_id: &str,
        code: Code,
        player: Player,
        comment: Option<String>,
    ) -> GameResult<Submission> {
        let handle = self.store.get(game_id).await?;
        self.submit_to(game_id, &handle, code, player, comment).await
    }

    /// Same as `submit_guess` on a handle that was already looked up
    ///
    /// The game may have been removed from the store since; the guess is
    /// still recorded on the handle and its snapshots reach nobody.
    pub(crate) async fn submit_to(
        &self,
        game_id: &str,
        handle: &GameHandle,
        code: Code,
        player: Player,
        comment: Option<String>,
    ) -> GameResult<Submission> {
        let mut game = handle.lock().await;

        game.enqueue(PendingGuess {
            code,
            comment,
            player,
        })?;

        tracing::debug!(
            "Buffered guess {} from {} in game {} (waiting for {:?})",
            code,
            player,
            game_id,
            game.waiting_for_player
        );

        let mut recorded = 0;
        while let Some(guess) = game.apply_next(self.mode) {
            tracing::info!(
                "Game {}: {} guessed {} -> {}",
                game_id,
                guess.player,
                guess.code,
                guess.feedback
            );
            recorded += 1;

            let snapshot = game.snapshot();
            self.hub.publish(game_id, &snapshot).await;
        }

        if let Some(winner) = game.winner.filter(|_| recorded > 0) {
            tracing::info!("🏆 Game {} completed, winner: {}", game_id, winner);
        }

        Ok(Submission {
            recorded,
            snapshot: game.snapshot(),
        })
    }

    /// Cancel a running game and publish the final snapshot
    ///
    /// # Errors
    ///
    /// `NotFound` if the game does not exist, `InvalidState` if it already finished
    pub async fn cancel(&self, game_id: &str) -> GameResult<()> {
        let handle = self.store.get(game_id).await?;
        let mut game = handle.lock().await;

        game.cancel()?;

        let snapshot = game.snapshot();
        self.hub.publish(game_id, &snapshot).await;

        tracing::info!("Game {} cancelled", game_id);
        Ok(())
    }
}
