use super::models::GameId;

/// Dense listing of games that have not ended
///
/// Positions `[0, count)` hold the active ids. Appends keep creation order;
/// removal swaps the last populated slot into the hole, so order is not
/// meaningful after any removal. Slots past `count` keep stale values and are
/// overwritten by later appends.
#[derive(Debug, Default)]
pub struct ActiveGameIndex {
    slots: Vec<GameId>,
    count: usize,
}

impl ActiveGameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, game_id: GameId) {
        if self.count < self.slots.len() {
            self.slots[self.count] = game_id;
        } else {
            self.slots.push(game_id);
        }
        self.count += 1;
    }

    /// Removes the first slot holding `game_id` by swapping in the last one
    ///
    /// Returns whether a slot was found. An unknown id is a no-op.
    pub fn remove_by_swap(&mut self, game_id: GameId) -> bool {
        let Some(position) = self.slots[..self.count]
            .iter()
            .position(|&id| id == game_id)
        else {
            return false;
        };

        let last = self.count - 1;
        if position != last {
            self.slots[position] = self.slots[last];
        }
        self.count -= 1;
        true
    }

    pub fn list(&self) -> Vec<GameId> {
        self.slots[..self.count].to_vec()
    }
}
