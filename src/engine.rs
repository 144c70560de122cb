use std::sync::Arc;
use tokio::{
    task::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    core::{
        BroadcastHub, Code, EvaluationMode, Feedback, GameHandle, GameSnapshot, GameStats,
        GameStore, Player, Subscription, CLEANUP_INTERVAL_SECONDS, GAME_TTL_SECONDS,
    },
    error::GameResult,
    services::{LifecycleManager, Submission, TurnSequencer},
};

/// Tunables of the game engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Scoring rule applied to every recorded guess
    pub mode: EvaluationMode,
    /// Games older than this are swept
    pub game_ttl: Duration,
    /// Period of the background sweeper
    pub cleanup_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mode: EvaluationMode::default(),
            game_ttl: Duration::from_secs(GAME_TTL_SECONDS),
            cleanup_interval: Duration::from_secs(CLEANUP_INTERVAL_SECONDS),
        }
    }
}

/// Entry point to the in-memory game engine
///
/// Built once per server and shared behind an `Arc`; owns the store, the
/// broadcast hub, the turn sequencer and the lifecycle manager.
#[derive(Debug)]
pub struct GameEngine {
    store: Arc<GameStore>,
    hub: Arc<BroadcastHub>,
    sequencer: TurnSequencer,
    lifecycle: Arc<LifecycleManager>,
}

impl GameEngine {
    pub fn new(settings: EngineSettings) -> Self {
        let store = Arc::new(GameStore::new());
        let hub = Arc::new(BroadcastHub::new());
        let sequencer = TurnSequencer::new(store.clone(), hub.clone(), settings.mode);
        let lifecycle = Arc::new(LifecycleManager::new(
            store.clone(),
            hub.clone(),
            settings.game_ttl,
            settings.cleanup_interval,
        ));

        Self {
            store,
            hub,
            sequencer,
            lifecycle,
        }
    }

    pub fn mode(&self) -> EvaluationMode {
        self.sequencer.mode()
    }

    /// Create a new game; missing secrets are generated randomly
    pub async fn create_game(
        &self,
        player_1_secret: Option<Code>,
        player_2_secret: Option<Code>,
    ) -> GameSnapshot {
        self.store.create(player_1_secret, player_2_secret).await
    }

    /// Submit a guess for `player`, see [`TurnSequencer::submit_guess`]
    pub async fn submit_guess(
        &self,
        game_id: &str,
        code: Code,
        player: Player,
        comment: Option<String>,
    ) -> GameResult<Submission> {
        self.sequencer
            .submit_guess(game_id, code, player, comment)
            .await
    }

    /// Current state of a game
    pub async fn snapshot(&self, game_id: &str) -> GameResult<GameSnapshot> {
        let handle = self.store.get(game_id).await?;
        let game = handle.lock().await;
        Ok(game.snapshot())
    }

    /// Subscribe to a game's updates, starting from its current state
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the game does not exist
    pub async fn subscribe(&self, game_id: &str) -> GameResult<Subscription> {
        let handle = self.store.get(game_id).await?;
        Ok(self.attach(game_id, &handle).await)
    }

    async fn attach(&self, game_id: &str, handle: &GameHandle) -> Subscription {
        let subscription = {
            let game = handle.lock().await;
            self.hub.subscribe(game_id, game.snapshot()).await
        };

        // A sweep may have removed the game between lookup and attach
        if !self.store.contains(game_id).await {
            self.hub.close(game_id).await;
        }

        subscription
    }

    /// Cancel a running game
    pub async fn cancel_game(&self, game_id: &str) -> GameResult<()> {
        self.sequencer.cancel(game_id).await
    }

    /// Remove a game immediately; unknown IDs are ignored
    pub async fn remove_game(&self, game_id: &str) -> bool {
        let removed = self.store.remove(game_id).await;
        self.hub.close(game_id).await;
        removed
    }

    /// Score a code against a secret with the engine's evaluation mode
    pub fn evaluate_guess(&self, code: &Code, secret: &Code) -> Feedback {
        self.mode().evaluate(code, secret)
    }

    /// Remove games whose TTL elapsed before `now`
    pub async fn sweep_expired_games(&self, now: Instant) -> usize {
        self.lifecycle.sweep(now).await
    }

    /// Start the periodic sweeper task
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        Arc::clone(&self.lifecycle).spawn()
    }

    pub async fn stats(&self) -> GameStats {
        self.store.stats().await
    }

    /// Number of live subscribers of a game
    pub async fn subscriber_count(&self, game_id: &str) -> usize {
        self.hub.subscriber_count(game_id).await
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
