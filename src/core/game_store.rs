use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::{
    sync::{Mutex, RwLock},
    time::{Duration, Instant},
};
use uuid::Uuid;

use super::{Code, GameId, GameSnapshot, GameState, GameStatus};
use crate::error::{GameError, GameResult};

/// Shared handle to one game; the mutex is the game's single-writer section
pub type GameHandle = Arc<Mutex<GameState>>;

/// Map entry: creation time is kept outside the lock so sweeping never waits on a game
#[derive(Debug)]
struct GameEntry {
    created_at: Instant,
    state: GameHandle,
}

/// Counts reported by the stats endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_games: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

/// Owner of every live game
#[derive(Debug, Default)]
pub struct GameStore {
    /// Map of game_id to game
    games: RwLock<HashMap<GameId, GameEntry>>,
}

impl GameStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new game with a unique ID
    ///
    /// # Arguments
    ///
    /// * `player_1_secret` - Player 1's secret, random if None
    /// * `player_2_secret` - Player 2's secret, random if None
    ///
    /// # Returns
    ///
    /// Snapshot of the newly created game
    pub async fn create(
        &self,
        player_1_secret: Option<Code>,
        player_2_secret: Option<Code>,
    ) -> GameSnapshot {
        let (secret_1, secret_2) = {
            let mut rng = rand::thread_rng();
            (
                player_1_secret.unwrap_or_else(|| Code::random(&mut rng)),
                player_2_secret.unwrap_or_else(|| Code::random(&mut rng)),
            )
        };

        let mut games = self.games.write().await;

        // Ensure uniqueness (very unlikely to collide, but check anyway)
        let mut game_id = Uuid::new_v4().to_string();
        while games.contains_key(&game_id) {
            game_id = Uuid::new_v4().to_string();
        }

        let game = GameState::new(game_id.clone(), secret_1, secret_2);
        let snapshot = game.snapshot();
        games.insert(
            game_id.clone(),
            GameEntry {
                created_at: game.created_at,
                state: Arc::new(Mutex::new(game)),
            },
        );

        tracing::info!("Created game {}", game_id);
        snapshot
    }

    /// Retrieve a game by ID
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such game exists
    pub async fn get(&self, game_id: &str) -> GameResult<GameHandle> {
        self.games
            .read()
            .await
            .get(game_id)
            .map(|entry| Arc::clone(&entry.state))
            .ok_or_else(|| GameError::not_found(game_id))
    }

    pub async fn contains(&self, game_id: &str) -> bool {
        self.games.read().await.contains_key(game_id)
    }

    /// Remove a game; removing an unknown ID is a no-op
    ///
    /// # Returns
    ///
    /// True if a game was removed
    pub async fn remove(&self, game_id: &str) -> bool {
        self.games.write().await.remove(game_id).is_some()
    }

    /// Remove every game with `created_at + timeout < now`, regardless of status
    ///
    /// A timeout too large to add to `created_at` never expires.
    ///
    /// # Returns
    ///
    /// IDs of the removed games
    pub async fn remove_expired(&self, now: Instant, timeout: Duration) -> Vec<GameId> {
        let mut games = self.games.write().await;

        let expired: Vec<GameId> = games
            .iter()
            .filter(|(_, entry)| {
                entry
                    .created_at
                    .checked_add(timeout)
                    .map_or(false, |deadline| deadline < now)
            })
            .map(|(game_id, _)| game_id.clone())
            .collect();

        for game_id in &expired {
            games.remove(game_id);
        }

        expired
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }

    /// Get statistics about stored games
    pub async fn stats(&self) -> GameStats {
        let handles: Vec<GameHandle> = self
            .games
            .read()
            .await
            .values()
            .map(|entry| Arc::clone(&entry.state))
            .collect();

        let mut stats = GameStats {
            total_games: handles.len(),
            ..GameStats::default()
        };

        for handle in handles {
            match handle.lock().await.status {
                GameStatus::InProgress => stats.in_progress += 1,
                GameStatus::Completed => stats.completed += 1,
                GameStatus::Cancelled => stats.cancelled += 1,
            }
        }

        stats
    }
}
