use thiserror::Error;

use crate::game::GameError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Stable machine-readable code for responses
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Game(GameError::GameNotActive) => "GAME_NOT_ACTIVE",
            AppError::Game(GameError::GameAlreadyStarted) => "GAME_ALREADY_STARTED",
            AppError::Game(GameError::NotEnoughPlayers) => "NOT_ENOUGH_PLAYERS",
            AppError::Game(GameError::GameFull) => "GAME_FULL",
            AppError::Game(GameError::NotYourTurn) => "NOT_YOUR_TURN",
            AppError::Internal => "INTERNAL",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::BadRequest(e.to_string())
    }
}
