use futures::Stream;
use std::collections::HashMap;
use tokio::sync::{mpsc, Mutex};

use super::{GameId, GameSnapshot};

/// Per-game fan-out of state snapshots
///
/// Every subscriber owns an unbounded channel, so a slow reader never
/// causes another reader to miss or reorder snapshots.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    /// Map of game_id to the senders of its attached subscribers
    channels: Mutex<HashMap<GameId, Vec<mpsc::UnboundedSender<GameSnapshot>>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new subscriber whose first element is `initial`
    ///
    /// The caller must hold the game's lock while subscribing so that no
    /// publish can slip in between `initial` and the attach.
    pub async fn subscribe(&self, game_id: &str, initial: GameSnapshot) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let terminal = initial.status.is_terminal();

        // Receiver is alive, send cannot fail
        let _ = tx.send(initial);

        if !terminal {
            self.channels
                .lock()
                .await
                .entry(game_id.to_string())
                .or_default()
                .push(tx);
        }

        tracing::debug!("Subscriber attached to game {}", game_id);
        Subscription::new(game_id.to_string(), rx)
    }

    /// Deliver a snapshot to every attached subscriber of a game
    ///
    /// # Returns
    ///
    /// Number of subscribers the snapshot was delivered to
    pub async fn publish(&self, game_id: &str, snapshot: &GameSnapshot) -> usize {
        let mut channels = self.channels.lock().await;

        let Some(senders) = channels.get_mut(game_id) else {
            return 0;
        };

        // Detached subscribers fail the send and are pruned here
        senders.retain(|tx| tx.send(snapshot.clone()).is_ok());
        let delivered = senders.len();

        // Nothing follows a terminal snapshot
        if senders.is_empty() || snapshot.status.is_terminal() {
            channels.remove(game_id);
        }

        tracing::debug!(
            "📢 Published state for game {} (status: {:?}) to {} subscribers",
            game_id,
            snapshot.status,
            delivered
        );
        delivered
    }

    /// Drop every subscriber channel of a game; their sequences end
    ///
    /// # Returns
    ///
    /// Number of channels closed
    pub async fn close(&self, game_id: &str) -> usize {
        self.channels
            .lock()
            .await
            .remove(game_id)
            .map(|senders| senders.len())
            .unwrap_or(0)
    }

    /// Number of subscribers still attached to a game
    pub async fn subscriber_count(&self, game_id: &str) -> usize {
        self.channels
            .lock()
            .await
            .get(game_id)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

/// One subscriber's ordered view of a game's snapshots
///
/// Ends after a terminal snapshot, or when the game is removed.
/// Dropping it detaches the subscriber.
#[derive(Debug)]
pub struct Subscription {
    game_id: GameId,
    receiver: mpsc::UnboundedReceiver<GameSnapshot>,
    finished: bool,
}

impl Subscription {
    fn new(game_id: GameId, receiver: mpsc::UnboundedReceiver<GameSnapshot>) -> Self {
        Self {
            game_id,
            receiver,
            finished: false,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Wait for the next snapshot
    ///
    /// # Returns
    ///
    /// None once the sequence has ended
    pub async fn next(&mut self) -> Option<GameSnapshot> {
        if self.finished {
            return None;
        }

        let snapshot = self.receiver.recv().await;
        match &snapshot {
            Some(s) if s.status.is_terminal() => self.finished = true,
            None => self.finished = true,
            Some(_) => {}
        }
        snapshot
    }

    /// Stop receiving; other subscribers and the game are unaffected
    pub fn detach(mut self) {
        self.receiver.close();
        tracing::debug!("Subscriber detached from game {}", self.game_id);
    }

    /// Adapt into a `Stream` for transports
    pub fn into_stream(self) -> impl Stream<Item = GameSnapshot> + Send + 'static {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription
                .next()
                .await
                .map(|snapshot| (snapshot, subscription))
        })
    }
}
