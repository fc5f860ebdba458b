// Public API
pub use errors::GameError;
pub use models::{Action, ActionPayload, Game, GameId, GameState, PayloadParseError};
pub use service::GameService;
pub use state_machine::{GameStateMachine, SessionRules};

// Internal modules
mod action_log;
mod active_index;
mod errors;
mod models;
mod registry;
mod roster;
mod service;
mod state_machine;
