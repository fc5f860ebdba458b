use std::collections::HashMap;

use super::models::{Action, GameId};

/// Per-turn action record keyed by (game, turn index)
#[derive(Debug, Default)]
pub struct ActionLog {
    actions: HashMap<(GameId, u64), Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the slot for one turn, replacing whatever was there
    pub fn record(&mut self, game_id: GameId, turn: u64, action: Action) {
        self.actions.insert((game_id, turn), action);
    }

    pub fn get(&self, game_id: GameId, turn: u64) -> Option<&Action> {
        self.actions.get(&(game_id, turn))
    }

    /// Recorded actions for turns `0..turn_count`, in turn order
    pub fn history(&self, game_id: GameId, turn_count: u64) -> Vec<Action> {
        (0..turn_count)
            .filter_map(|turn| self.get(game_id, turn).cloned())
            .collect()
    }
}
