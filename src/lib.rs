// Library crate for the turnkeeper session manager
// This file exposes the public API for integration tests and the binary

pub mod commands;
pub mod config;
pub mod event;
pub mod game;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use commands::{CommandHandler, CommandMessage, CommandType, ResponseMessage};
pub use config::ServiceConfig;
pub use event::{EventBus, EventHandler, GameEvent, GameSubscription};
pub use game::{ActionPayload, GameError, GameId, GameService, GameState, SessionRules};
pub use shared::AppError;
