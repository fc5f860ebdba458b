use thiserror::Error;

/// Named faults for rejected transitions
///
/// A rejected transition leaves every table untouched and emits nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Game is not active")]
    GameNotActive,

    #[error("Game has already started")]
    GameAlreadyStarted,

    #[error("Not enough players to start the game")]
    NotEnoughPlayers,

    #[error("Game is full")]
    GameFull,

    #[error("Not your turn")]
    NotYourTurn,
}
