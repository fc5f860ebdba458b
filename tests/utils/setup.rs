//! Test setup - builds a service with players already seated
#![allow(dead_code)] // Test utilities may not all be used in every test

use tokio::sync::broadcast;

use turnkeeper::{ActionPayload, EventBus, GameEvent, GameId, GameService, SessionRules};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: GameService,
    pub events: broadcast::Receiver<GameEvent>,
    pub game_id: GameId,
    pub players: Vec<String>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    rules: SessionRules,
    start: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            rules: SessionRules::default(),
            start: false,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie", "david"])
    }

    pub fn with_rules(mut self, rules: SessionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn started(mut self) -> Self {
        self.start = true;
        self
    }

    /// Creates one game, seats the players and optionally starts it.
    /// The event receiver is taken after setup, so it starts empty.
    pub async fn build(self) -> TestSetup {
        let service = GameService::new(self.rules, EventBus::new(256));
        let creator = self.players.first().map(String::as_str).unwrap_or("host");
        let game_id = service.create_game(creator).await;

        for player in &self.players {
            service.join_game(game_id, player).await.unwrap();
        }
        if self.start {
            service.start_game(game_id).await.unwrap();
        }

        let events = service.subscribe();
        TestSetup {
            service,
            events,
            game_id,
            players: self.players,
        }
    }
}

impl TestSetup {
    pub fn player(&self, seat: usize) -> &str {
        &self.players[seat]
    }

    /// Plays `turns` actions in seat order starting from the current seat
    pub async fn play_turns(&self, turns: usize) {
        for i in 0..turns {
            let current = self.service.current_player(self.game_id).await.unwrap();
            self.service
                .submit_action(self.game_id, payload(i as u8), &current)
                .await
                .unwrap();
        }
    }
}

/// Deterministic 32-byte payload filled with `tag`
pub fn payload(tag: u8) -> ActionPayload {
    ActionPayload::new([tag; ActionPayload::LEN])
}
