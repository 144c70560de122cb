use std::sync::Arc;
use tokio::{
    task::JoinHandle,
    time::{Duration, Instant},
};

use crate::core::{BroadcastHub, GameStore};

/// Removes games that outlived their time-to-live
#[derive(Debug)]
pub struct LifecycleManager {
    store: Arc<GameStore>,
    hub: Arc<BroadcastHub>,
    /// Maximum age of a game, whatever its status
    game_ttl: Duration,
    /// Time between two sweeps of the background task
    interval: Duration,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<GameStore>,
        hub: Arc<BroadcastHub>,
        game_ttl: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            hub,
            game_ttl,
            interval,
        }
    }

    pub fn game_ttl(&self) -> Duration {
        self.game_ttl
    }

    /// Remove games older than the configured TTL
    ///
    /// # Returns
    ///
    /// Number of games cleaned up
    pub async fn sweep(&self, now: Instant) -> usize {
        self.sweep_with_timeout(now, self.game_ttl).await
    }

    /// Remove every game with `created_at + timeout < now`
    ///
    /// Subscribers of a removed game see their sequence end; a guess being
    /// processed on it at the same time still finishes, but its snapshots go nowhere.
    pub async fn sweep_with_timeout(&self, now: Instant, timeout: Duration) -> usize {
        let removed = self.store.remove_expired(now, timeout).await;

        for game_id in &removed {
            let closed = self.hub.close(game_id).await;
            tracing::info!(
                "🧹 Removed expired game {} ({} subscribers detached)",
                game_id,
                closed
            );
        }

        removed.len()
    }

    /// Run `sweep` every `interval` on the current runtime
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let cleaned = self.sweep(Instant::now()).await;
                if cleaned > 0 {
                    tracing::info!("Cleanup removed {} games", cleaned);
                }
            }
        })
    }
}
