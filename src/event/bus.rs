use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::GameEvent;
use crate::game::GameId;

/// Event bus for distributing game notifications
///
/// Every event goes to the global feed. Events for a game with a live
/// per-game channel also go there; that channel is dropped once the game
/// ends, which closes it for its receivers after they drain it.
#[derive(Debug, Clone)]
pub struct EventBus {
    all: broadcast::Sender<GameEvent>,
    /// Game-specific event channels: game_id -> sender
    game_channels: Arc<RwLock<HashMap<GameId, broadcast::Sender<GameEvent>>>>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

impl EventBus {
    /// Creates a new event bus whose channels buffer `capacity` events
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (all, _) = broadcast::channel(capacity);
        Self {
            all,
            game_channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publishes an event to the global feed and to its game's channel
    pub async fn emit(&self, event: GameEvent) {
        let game_id = event.game_id();
        let is_final = matches!(event, GameEvent::GameEnded { .. });

        match self.all.send(event.clone()) {
            Ok(receiver_count) => {
                debug!(
                    game_id = game_id,
                    event_type = event.event_type(),
                    receivers = receiver_count,
                    "Event emitted"
                );
            }
            Err(_) => {
                debug!(game_id = game_id, "Event emitted with no receivers");
            }
        }

        if is_final {
            let mut game_channels = self.game_channels.write().await;
            if let Some(sender) = game_channels.remove(&game_id) {
                let _ = sender.send(event);
                debug!(game_id = game_id, "Game channel closed");
            }
            return;
        }

        let game_channels = self.game_channels.read().await;
        if let Some(sender) = game_channels.get(&game_id) {
            if sender.send(event).is_err() {
                debug!(game_id = game_id, "Game event emitted with no receivers");
            }
        }
    }

    /// Subscribe to every event on the bus
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.all.subscribe()
    }

    /// Subscribe to events for a specific game
    ///
    /// `is_active` must reflect the game's state at the time of the call.
    /// Ended or unknown games get a receiver that is already closed, and no
    /// channel is registered for them.
    pub async fn subscribe_to_game(
        &self,
        game_id: GameId,
        is_active: bool,
    ) -> broadcast::Receiver<GameEvent> {
        if !is_active {
            debug!(game_id = game_id, "Game not active, returning closed receiver");
            let (_, receiver) = broadcast::channel(1);
            return receiver;
        }

        let game_channels = self.game_channels.read().await;

        if let Some(sender) = game_channels.get(&game_id) {
            sender.subscribe()
        } else {
            debug!(game_id = game_id, "Creating new game channel for subscription");
            drop(game_channels);

            let mut game_channels = self.game_channels.write().await;
            game_channels
                .entry(game_id)
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .subscribe()
        }
    }

    /// Number of games that currently have a dedicated channel
    pub async fn game_channel_count(&self) -> usize {
        self.game_channels.read().await.len()
    }
}
