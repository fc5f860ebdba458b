use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::ServiceConfig,
    event::{EventBus, GameEvent},
    game::{
        errors::GameError,
        models::{Action, ActionPayload, GameId, GameState},
        state_machine::{GameStateMachine, SessionRules},
    },
};

/// Entry point for every session operation
///
/// All tables sit behind one lock. Mutations take the write lock and publish
/// their notification before releasing it, so observers see events in the
/// same order the transitions were applied. Reads share the read lock and
/// always observe a consistent snapshot.
#[derive(Clone)]
pub struct GameService {
    machine: Arc<RwLock<GameStateMachine>>,
    event_bus: EventBus,
}

impl GameService {
    pub fn new(rules: SessionRules, event_bus: EventBus) -> Self {
        Self {
            machine: Arc::new(RwLock::new(GameStateMachine::new(rules))),
            event_bus,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            SessionRules::from(config),
            EventBus::new(config.event_capacity),
        )
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Registers a new game and returns its identifier
    #[instrument(skip(self))]
    pub async fn create_game(&self, creator: &str) -> GameId {
        let mut machine = self.machine.write().await;
        let (game_id, event) = machine.create_game(creator, Utc::now());

        info!(game_id = game_id, creator = %creator, "Game created");
        self.event_bus.emit(event).await;
        game_id
    }

    #[instrument(skip(self))]
    pub async fn join_game(&self, game_id: GameId, player: &str) -> Result<(), GameError> {
        let mut machine = self.machine.write().await;
        let event = machine.join_game(game_id, player).map_err(|e| {
            warn!(game_id = game_id, player = %player, error = %e, "Join rejected");
            e
        })?;

        info!(
            game_id = game_id,
            player = %player,
            roster_size = machine.roster(game_id).len(),
            "Player joined game"
        );
        self.event_bus.emit(event).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn start_game(&self, game_id: GameId) -> Result<(), GameError> {
        let mut machine = self.machine.write().await;
        let event = machine.start_game(game_id, Utc::now()).map_err(|e| {
            warn!(game_id = game_id, error = %e, "Start rejected");
            e
        })?;

        info!(game_id = game_id, "Game started");
        self.event_bus.emit(event).await;
        Ok(())
    }

    /// Records `payload` for the current turn if `actor` holds it
    #[instrument(skip(self, payload))]
    pub async fn submit_action(
        &self,
        game_id: GameId,
        payload: ActionPayload,
        actor: &str,
    ) -> Result<(), GameError> {
        let mut machine = self.machine.write().await;
        let event = machine
            .submit_action(game_id, payload, actor, Utc::now())
            .map_err(|e| {
                warn!(game_id = game_id, actor = %actor, error = %e, "Action rejected");
                e
            })?;

        let game = machine.get_game(game_id);
        info!(
            game_id = game_id,
            actor = %actor,
            turn_count = game.turn_count,
            next_player_index = game.current_player_index,
            "Action submitted"
        );
        self.event_bus.emit(event).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn end_game(&self, game_id: GameId, actor: &str) -> Result<(), GameError> {
        let mut machine = self.machine.write().await;
        let event = machine.end_game(game_id, actor).map_err(|e| {
            warn!(game_id = game_id, actor = %actor, error = %e, "End rejected");
            e
        })?;

        info!(game_id = game_id, actor = %actor, "Game ended");
        self.event_bus.emit(event).await;
        Ok(())
    }

    /// Public summary of a game; unknown ids give the zero record's summary
    pub async fn get_game_state(&self, game_id: GameId) -> GameState {
        let machine = self.machine.read().await;
        let game = machine.get_game(game_id);
        if game.id == 0 {
            debug!(game_id = game_id, "Game state requested for unknown id");
        }
        game.state()
    }

    pub async fn get_active_games(&self) -> Vec<GameId> {
        self.machine.read().await.list_active()
    }

    pub async fn get_not_started_games(&self) -> Vec<GameId> {
        self.machine.read().await.list_not_started()
    }

    pub async fn get_roster(&self, game_id: GameId) -> Vec<String> {
        self.machine.read().await.roster(game_id)
    }

    pub async fn current_player(&self, game_id: GameId) -> Option<String> {
        self.machine.read().await.current_player(game_id)
    }

    pub async fn get_action(&self, game_id: GameId, turn: u64) -> Option<Action> {
        self.machine.read().await.action(game_id, turn)
    }

    pub async fn get_actions(&self, game_id: GameId) -> Vec<Action> {
        self.machine.read().await.actions(game_id)
    }

    /// Receiver for every notification emitted from now on
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<GameEvent> {
        self.event_bus.subscribe()
    }

    /// Receiver for one game's notifications; closes after it ends
    ///
    /// Ended and unknown games get an already closed receiver. The read lock
    /// is held while subscribing so an `end_game` cannot slip in between the
    /// liveness check and the registration.
    pub async fn subscribe_to_game(
        &self,
        game_id: GameId,
    ) -> tokio::sync::broadcast::Receiver<GameEvent> {
        let machine = self.machine.read().await;
        let is_active = machine.get_game(game_id).is_active;
        self.event_bus.subscribe_to_game(game_id, is_active).await
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new(SessionRules::default(), EventBus::default())
    }
}
