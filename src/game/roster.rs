use std::collections::HashMap;

use super::models::GameId;

/// Per-game ordered list of joined players
///
/// Seat order is join order and defines turn order. The same identity may
/// hold more than one seat.
#[derive(Debug, Default)]
pub struct PlayerRoster {
    seats: HashMap<GameId, Vec<String>>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an empty roster for a new game
    pub fn init(&mut self, game_id: GameId) {
        self.seats.entry(game_id).or_default();
    }

    /// Appends a player at the next free seat and returns that seat index
    pub fn push(&mut self, game_id: GameId, player: &str) -> usize {
        let seats = self.seats.entry(game_id).or_default();
        seats.push(player.to_string());
        seats.len() - 1
    }

    pub fn size(&self, game_id: GameId) -> usize {
        self.seats.get(&game_id).map_or(0, Vec::len)
    }

    pub fn is_full(&self, game_id: GameId, capacity: usize) -> bool {
        self.size(game_id) >= capacity
    }

    pub fn player_at(&self, game_id: GameId, seat: usize) -> Option<&str> {
        self.seats
            .get(&game_id)
            .and_then(|seats| seats.get(seat))
            .map(String::as_str)
    }

    /// Players in turn order, empty for unknown games
    pub fn players(&self, game_id: GameId) -> &[String] {
        self.seats
            .get(&game_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
