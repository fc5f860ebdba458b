use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{bus::EventBus, events::GameEvent, handler::EventHandler};
use crate::game::GameId;

/// Routes events from a receiver to a handler on a background task
///
/// The task ends when the receiver closes: for a per-game subscription that
/// is after the game's GameEnded event, or straight away when the receiver
/// was handed out for a game that is not active.
pub struct GameSubscription {
    /// `None` follows every game
    game_id: Option<GameId>,
    handler: Arc<dyn EventHandler>,
    receiver: Receiver<GameEvent>,
}

impl GameSubscription {
    /// Subscription to the global feed
    pub fn all(handler: Arc<dyn EventHandler>, event_bus: &EventBus) -> Self {
        Self {
            game_id: None,
            handler,
            receiver: event_bus.subscribe(),
        }
    }

    /// Subscription to one game, fed by a receiver from
    /// `GameService::subscribe_to_game`
    pub fn for_game(
        game_id: GameId,
        handler: Arc<dyn EventHandler>,
        receiver: Receiver<GameEvent>,
    ) -> Self {
        Self {
            game_id: Some(game_id),
            handler,
            receiver,
        }
    }

    /// Start the subscription - spawns a background task that listens to
    /// events and routes them to the handler
    pub fn start(self) -> JoinHandle<()> {
        info!(
            game_id = ?self.game_id,
            handler = self.handler.name(),
            "Starting game subscription"
        );

        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let handler_name = self.handler.name();

        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.handler.handle(&event).await {
                        warn!(
                            game_id = event.game_id(),
                            handler = handler_name,
                            error = %e,
                            "Event handler failed"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        game_id = ?self.game_id,
                        handler = handler_name,
                        skipped = skipped,
                        "Subscription lagged, events dropped"
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }

        info!(
            game_id = ?self.game_id,
            handler = handler_name,
            "Game subscription ended - no more events"
        );
    }
}
