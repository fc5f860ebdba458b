use serde::{Deserialize, Serialize};

use crate::game::{ActionPayload, GameId};

/// Notifications published after a transition is accepted
///
/// Events are facts: each one describes a change that has already been
/// applied. They are fire-and-forget and ordered per emitting operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new game was registered
    GameCreated { game_id: GameId, creator: String },

    /// A player took the next free seat
    PlayerJoined { game_id: GameId, player: String },

    /// The game moved from created to started
    GameStarted { game_id: GameId },

    /// The current player's action was recorded and the turn rotated
    ActionSubmitted {
        game_id: GameId,
        player: String,
        payload: ActionPayload,
    },

    /// The game was retired from the active listing
    GameEnded { game_id: GameId },
}

impl GameEvent {
    /// Get the game_id associated with this event
    pub fn game_id(&self) -> GameId {
        match self {
            GameEvent::GameCreated { game_id, .. } => *game_id,
            GameEvent::PlayerJoined { game_id, .. } => *game_id,
            GameEvent::GameStarted { game_id } => *game_id,
            GameEvent::ActionSubmitted { game_id, .. } => *game_id,
            GameEvent::GameEnded { game_id } => *game_id,
        }
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameCreated { .. } => "game_created",
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::ActionSubmitted { .. } => "action_submitted",
            GameEvent::GameEnded { .. } => "game_ended",
        }
    }
}
