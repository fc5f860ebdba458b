use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::models::{Game, GameId};

/// Owns the game table and hands out sequential identifiers
#[derive(Debug, Default)]
pub struct GameRegistry {
    /// Last identifier issued, 0 before the first game
    last_id: GameId,
    games: HashMap<GameId, Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next identifier and stores a fresh record for it
    pub fn create(&mut self, now: DateTime<Utc>) -> GameId {
        self.last_id += 1;
        let id = self.last_id;
        self.games.insert(id, Game::new(id, now));
        id
    }

    /// Returns the stored record, or the zero record for ids never created
    pub fn get(&self, game_id: GameId) -> Game {
        self.games.get(&game_id).cloned().unwrap_or_default()
    }

    /// Mutable access to an existing record
    pub fn get_mut(&mut self, game_id: GameId) -> Option<&mut Game> {
        self.games.get_mut(&game_id)
    }
}
