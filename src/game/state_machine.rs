use chrono::{DateTime, Utc};
use tracing::warn;

use super::{
    action_log::ActionLog,
    active_index::ActiveGameIndex,
    errors::GameError,
    models::{Action, ActionPayload, Game, GameId},
    registry::GameRegistry,
    roster::PlayerRoster,
};
use crate::config::ServiceConfig;
use crate::event::GameEvent;

/// Limits applied by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRules {
    /// Roster capacity per game
    pub max_players: usize,
    /// Minimum roster size accepted by `start_game`
    pub min_players_to_start: usize,
    /// `list_not_started` keeps games whose roster is below this
    pub not_started_threshold: usize,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            max_players: 10,
            min_players_to_start: 2,
            not_started_threshold: 3,
        }
    }
}

impl SessionRules {
    /// Smallest roster a game can start with
    pub const MIN_PLAYERS_FLOOR: usize = 2;

    /// Repairs limits that would let a game start without a turn order
    ///
    /// `min_players_to_start` is raised to two. A `max_players` below the
    /// start minimum leaves no startable roster, so both fall back to the
    /// defaults.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let mut rules = self;

        if rules.min_players_to_start < Self::MIN_PLAYERS_FLOOR {
            warn!(
                min_players_to_start = rules.min_players_to_start,
                floor = Self::MIN_PLAYERS_FLOOR,
                "Start minimum too low, clamping"
            );
            rules.min_players_to_start = Self::MIN_PLAYERS_FLOOR;
        }

        if rules.max_players < rules.min_players_to_start {
            warn!(
                max_players = rules.max_players,
                min_players_to_start = rules.min_players_to_start,
                "Capacity below start minimum, using default limits"
            );
            rules.max_players = defaults.max_players;
            rules.min_players_to_start = defaults.min_players_to_start;
        }

        rules
    }
}

impl From<&ServiceConfig> for SessionRules {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            max_players: config.max_players,
            min_players_to_start: config.min_players_to_start,
            not_started_threshold: config.not_started_threshold,
        }
    }
}

/// Game lifecycle over the registry, rosters, action log and active index
///
/// Every transition checks all of its preconditions before touching any
/// table, so a returned error means nothing changed. On success the
/// notification to publish is returned to the caller.
#[derive(Debug, Default)]
pub struct GameStateMachine {
    rules: SessionRules,
    registry: GameRegistry,
    roster: PlayerRoster,
    actions: ActionLog,
    active: ActiveGameIndex,
}

impl GameStateMachine {
    pub fn new(rules: SessionRules) -> Self {
        Self {
            rules: rules.validated(),
            registry: GameRegistry::new(),
            roster: PlayerRoster::new(),
            actions: ActionLog::new(),
            active: ActiveGameIndex::new(),
        }
    }

    pub fn rules(&self) -> SessionRules {
        self.rules
    }

    pub fn create_game(&mut self, creator: &str, now: DateTime<Utc>) -> (GameId, GameEvent) {
        let game_id = self.registry.create(now);
        self.roster.init(game_id);
        self.active.add(game_id);

        (
            game_id,
            GameEvent::GameCreated {
                game_id,
                creator: creator.to_string(),
            },
        )
    }

    /// Seats a player. Joining after the game started is allowed, and so is
    /// joining twice with the same identity.
    pub fn join_game(&mut self, game_id: GameId, player: &str) -> Result<GameEvent, GameError> {
        if !self.registry.get(game_id).is_active {
            return Err(GameError::GameNotActive);
        }
        if self.roster.is_full(game_id, self.rules.max_players) {
            return Err(GameError::GameFull);
        }

        self.roster.push(game_id, player);

        Ok(GameEvent::PlayerJoined {
            game_id,
            player: player.to_string(),
        })
    }

    /// Marks the game started. Seat 0 acts first; turn state is not touched.
    pub fn start_game(
        &mut self,
        game_id: GameId,
        now: DateTime<Utc>,
    ) -> Result<GameEvent, GameError> {
        if self.registry.get(game_id).is_started {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.roster.size(game_id) < self.rules.min_players_to_start {
            return Err(GameError::NotEnoughPlayers);
        }

        // a non-empty roster only exists for created games
        let game = self
            .registry
            .get_mut(game_id)
            .ok_or(GameError::NotEnoughPlayers)?;
        game.is_started = true;
        game.last_action_timestamp = now;

        Ok(GameEvent::GameStarted { game_id })
    }

    /// Records the action for the current turn and rotates to the next seat
    ///
    /// Only `is_active` and turn ownership are checked; a created game that
    /// was never started accepts actions in roster order.
    pub fn submit_action(
        &mut self,
        game_id: GameId,
        payload: ActionPayload,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<GameEvent, GameError> {
        let game = self.registry.get(game_id);
        self.check_turn(&game, actor)?;

        self.actions.record(
            game_id,
            game.turn_count,
            Action {
                player: actor.to_string(),
                payload,
                timestamp: now,
            },
        );

        let roster_size = self.roster.size(game_id);
        let game = self
            .registry
            .get_mut(game_id)
            .ok_or(GameError::GameNotActive)?;
        game.turn_count += 1;
        game.current_player_index = (game.current_player_index + 1) % roster_size;
        game.last_action_timestamp = now;

        Ok(GameEvent::ActionSubmitted {
            game_id,
            player: actor.to_string(),
            payload,
        })
    }

    /// Ends the game on the current player's turn and drops it from the
    /// active listing. Turn state is left as it was.
    pub fn end_game(&mut self, game_id: GameId, actor: &str) -> Result<GameEvent, GameError> {
        let game = self.registry.get(game_id);
        self.check_turn(&game, actor)?;

        let game = self
            .registry
            .get_mut(game_id)
            .ok_or(GameError::GameNotActive)?;
        game.is_active = false;
        self.active.remove_by_swap(game_id);

        Ok(GameEvent::GameEnded { game_id })
    }

    /// Active and `actor` holds the current seat
    fn check_turn(&self, game: &Game, actor: &str) -> Result<(), GameError> {
        if !game.is_active {
            return Err(GameError::GameNotActive);
        }
        match self.roster.player_at(game.id, game.current_player_index) {
            Some(current) if current == actor => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    pub fn get_game(&self, game_id: GameId) -> Game {
        self.registry.get(game_id)
    }

    pub fn list_active(&self) -> Vec<GameId> {
        self.active.list()
    }

    /// Active games not yet started whose roster is below the listing
    /// threshold. This threshold is separate from the start minimum.
    pub fn list_not_started(&self) -> Vec<GameId> {
        self.active
            .list()
            .into_iter()
            .filter(|&game_id| {
                !self.registry.get(game_id).is_started
                    && self.roster.size(game_id) < self.rules.not_started_threshold
            })
            .collect()
    }

    pub fn roster(&self, game_id: GameId) -> Vec<String> {
        self.roster.players(game_id).to_vec()
    }

    pub fn current_player(&self, game_id: GameId) -> Option<String> {
        let game = self.registry.get(game_id);
        self.roster
            .player_at(game_id, game.current_player_index)
            .map(str::to_string)
    }

    pub fn action(&self, game_id: GameId, turn: u64) -> Option<Action> {
        self.actions.get(game_id, turn).cloned()
    }

    pub fn actions(&self, game_id: GameId) -> Vec<Action> {
        let game = self.registry.get(game_id);
        self.actions.history(game_id, game.turn_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn payload(tag: u8) -> ActionPayload {
        ActionPayload::new([tag; ActionPayload::LEN])
    }

    /// Creates a game and seats the given players
    fn game_with_players(machine: &mut GameStateMachine, players: &[&str]) -> GameId {
        let (game_id, _) = machine.create_game("host", Utc::now());
        for player in players {
            machine.join_game(game_id, player).unwrap();
        }
        game_id
    }

    #[test]
    fn test_create_game_emits_and_indexes() {
        let mut machine = GameStateMachine::default();
        let now = Utc::now();

        let (first, event) = machine.create_game("alice", now);
        let (second, _) = machine.create_game("bob", now);

        assert_eq!((first, second), (1, 2));
        assert_eq!(
            event,
            GameEvent::GameCreated {
                game_id: 1,
                creator: "alice".to_string()
            }
        );
        assert_eq!(machine.list_active(), vec![1, 2]);
        assert_eq!(machine.get_game(1), Game::new(1, now));
        assert!(machine.roster(1).is_empty());
    }

    #[test]
    fn test_join_fills_to_capacity() {
        let mut machine = GameStateMachine::default();
        let (game_id, _) = machine.create_game("host", Utc::now());

        for i in 0..10 {
            let event = machine.join_game(game_id, &format!("player-{}", i)).unwrap();
            assert_eq!(event.game_id(), game_id);
        }

        assert_eq!(machine.join_game(game_id, "late"), Err(GameError::GameFull));
        assert_eq!(machine.roster(game_id).len(), 10);
    }

    #[test]
    fn test_join_respects_configured_capacity() {
        let mut machine = GameStateMachine::new(SessionRules {
            max_players: 2,
            ..SessionRules::default()
        });
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);

        assert_eq!(machine.join_game(game_id, "carol"), Err(GameError::GameFull));
    }

    #[test]
    fn test_join_unknown_game_is_not_active() {
        let mut machine = GameStateMachine::default();

        assert_eq!(machine.join_game(9, "alice"), Err(GameError::GameNotActive));
        assert!(machine.roster(9).is_empty());
    }

    #[test]
    fn test_join_after_start_is_allowed() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);
        machine.start_game(game_id, Utc::now()).unwrap();

        machine.join_game(game_id, "carol").unwrap();
        assert_eq!(machine.roster(game_id), vec!["alice", "bob", "carol"]);
    }

    #[rstest]
    #[case(vec![], Err(GameError::NotEnoughPlayers))]
    #[case(vec!["alice"], Err(GameError::NotEnoughPlayers))]
    #[case(vec!["alice", "bob"], Ok(()))]
    #[case(vec!["alice", "bob", "carol"], Ok(()))]
    fn test_start_requires_two_players(
        #[case] players: Vec<&str>,
        #[case] expected: Result<(), GameError>,
    ) {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &players);

        let result = machine.start_game(game_id, Utc::now()).map(|_| ());
        assert_eq!(result, expected);
        assert_eq!(machine.get_game(game_id).is_started, expected.is_ok());
    }

    #[test]
    fn test_start_twice_fails() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);
        let started_at = Utc::now();

        let event = machine.start_game(game_id, started_at).unwrap();
        assert_eq!(event, GameEvent::GameStarted { game_id });

        let game = machine.get_game(game_id);
        assert!(game.is_started);
        assert!(game.is_active);
        assert_eq!(game.current_player_index, 0);
        assert_eq!(game.last_action_timestamp, started_at);

        assert_eq!(
            machine.start_game(game_id, Utc::now()),
            Err(GameError::GameAlreadyStarted)
        );
        assert_eq!(machine.get_game(game_id).last_action_timestamp, started_at);
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(1, vec!["alice"])]
    fn test_low_start_minimum_is_clamped(
        #[case] min_players_to_start: usize,
        #[case] players: Vec<&str>,
    ) {
        let mut machine = GameStateMachine::new(SessionRules {
            min_players_to_start,
            ..SessionRules::default()
        });
        let game_id = game_with_players(&mut machine, &players);

        assert_eq!(machine.rules().min_players_to_start, 2);
        assert_eq!(
            machine.start_game(game_id, Utc::now()),
            Err(GameError::NotEnoughPlayers)
        );
        assert!(!machine.get_game(game_id).is_started);
    }

    #[test]
    fn test_capacity_below_start_minimum_uses_defaults() {
        let machine = GameStateMachine::new(SessionRules {
            max_players: 3,
            min_players_to_start: 5,
            not_started_threshold: 4,
        });

        assert_eq!(
            machine.rules(),
            SessionRules {
                not_started_threshold: 4,
                ..SessionRules::default()
            }
        );
    }

    #[test]
    fn test_submit_action_rotates_turn() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob", "carol"]);
        machine.start_game(game_id, Utc::now()).unwrap();

        let order = ["alice", "bob", "carol", "alice", "bob"];
        for (turn, player) in order.iter().enumerate() {
            assert_eq!(machine.current_player(game_id).as_deref(), Some(*player));
            let now = Utc::now();
            let event = machine
                .submit_action(game_id, payload(turn as u8), player, now)
                .unwrap();
            assert_eq!(
                event,
                GameEvent::ActionSubmitted {
                    game_id,
                    player: player.to_string(),
                    payload: payload(turn as u8),
                }
            );

            let game = machine.get_game(game_id);
            assert_eq!(game.turn_count, turn as u64 + 1);
            assert_eq!(game.current_player_index, (turn + 1) % 3);
            assert_eq!(game.last_action_timestamp, now);
        }

        let history = machine.actions(game_id);
        assert_eq!(history.len(), 5);
        assert_eq!(history[3].player, "alice");
        assert_eq!(history[3].payload, payload(3));
        assert_eq!(machine.action(game_id, 4).unwrap().player, "bob");
        assert!(machine.action(game_id, 5).is_none());
    }

    #[test]
    fn test_submit_action_out_of_turn() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);
        machine.start_game(game_id, Utc::now()).unwrap();
        let before = machine.get_game(game_id);

        let result = machine.submit_action(game_id, payload(1), "bob", Utc::now());
        assert_eq!(result, Err(GameError::NotYourTurn));

        let result = machine.submit_action(game_id, payload(1), "mallory", Utc::now());
        assert_eq!(result, Err(GameError::NotYourTurn));

        assert_eq!(machine.get_game(game_id), before);
        assert!(machine.action(game_id, 0).is_none());
    }

    #[test]
    fn test_submit_action_before_start_follows_roster_order() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);

        machine
            .submit_action(game_id, payload(1), "alice", Utc::now())
            .unwrap();

        let game = machine.get_game(game_id);
        assert!(!game.is_started);
        assert_eq!(game.turn_count, 1);
        assert_eq!(game.current_player_index, 1);
    }

    #[test]
    fn test_submit_action_with_empty_roster() {
        let mut machine = GameStateMachine::default();
        let (game_id, _) = machine.create_game("host", Utc::now());

        let result = machine.submit_action(game_id, payload(1), "host", Utc::now());
        assert_eq!(result, Err(GameError::NotYourTurn));
    }

    #[test]
    fn test_submit_action_unknown_game() {
        let mut machine = GameStateMachine::default();

        let result = machine.submit_action(3, payload(1), "alice", Utc::now());
        assert_eq!(result, Err(GameError::GameNotActive));
    }

    #[test]
    fn test_duplicate_seat_plays_both_turns() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "alice"]);
        machine.start_game(game_id, Utc::now()).unwrap();

        machine.submit_action(game_id, payload(1), "alice", Utc::now()).unwrap();
        machine.submit_action(game_id, payload(2), "alice", Utc::now()).unwrap();

        let game = machine.get_game(game_id);
        assert_eq!(game.turn_count, 2);
        assert_eq!(game.current_player_index, 0);
    }

    #[test]
    fn test_end_game_checks_turn() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);
        machine.start_game(game_id, Utc::now()).unwrap();
        machine.submit_action(game_id, payload(1), "alice", Utc::now()).unwrap();

        assert_eq!(machine.end_game(game_id, "alice"), Err(GameError::NotYourTurn));
        assert!(machine.get_game(game_id).is_active);
        assert_eq!(machine.list_active(), vec![game_id]);

        let event = machine.end_game(game_id, "bob").unwrap();
        assert_eq!(event, GameEvent::GameEnded { game_id });

        let game = machine.get_game(game_id);
        assert!(!game.is_active);
        assert_eq!(game.turn_count, 1);
        assert_eq!(game.current_player_index, 1);
        assert!(machine.list_active().is_empty());
    }

    #[test]
    fn test_ended_game_rejects_everything() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);
        machine.start_game(game_id, Utc::now()).unwrap();
        machine.end_game(game_id, "alice").unwrap();

        assert_eq!(machine.join_game(game_id, "carol"), Err(GameError::GameNotActive));
        assert_eq!(
            machine.submit_action(game_id, payload(1), "alice", Utc::now()),
            Err(GameError::GameNotActive)
        );
        assert_eq!(machine.end_game(game_id, "alice"), Err(GameError::GameNotActive));
        assert_eq!(
            machine.start_game(game_id, Utc::now()),
            Err(GameError::GameAlreadyStarted)
        );
    }

    #[test]
    fn test_end_removes_only_that_game() {
        let mut machine = GameStateMachine::default();
        let first = game_with_players(&mut machine, &["alice", "bob"]);
        let second = game_with_players(&mut machine, &["carol", "dave"]);
        let third = game_with_players(&mut machine, &["erin", "frank"]);

        machine.end_game(first, "alice").unwrap();

        let mut active = machine.list_active();
        active.sort_unstable();
        assert_eq!(active, vec![second, third]);
    }

    #[test]
    fn test_list_not_started_threshold() {
        let mut machine = GameStateMachine::default();
        let open = game_with_players(&mut machine, &["alice", "bob"]);
        let crowded = game_with_players(&mut machine, &["carol", "dave", "erin"]);
        let started = game_with_players(&mut machine, &["frank", "grace"]);
        machine.start_game(started, Utc::now()).unwrap();
        let empty = game_with_players(&mut machine, &[]);

        assert_eq!(machine.list_not_started(), vec![open, empty]);
        assert!(machine.list_active().contains(&crowded));

        machine.join_game(open, "heidi").unwrap();
        assert_eq!(machine.list_not_started(), vec![empty]);
    }

    #[test]
    fn test_list_not_started_skips_ended_games() {
        let mut machine = GameStateMachine::default();
        let game_id = game_with_players(&mut machine, &["alice", "bob"]);
        machine.end_game(game_id, "alice").unwrap();

        assert!(machine.list_not_started().is_empty());
    }

    #[test]
    fn test_unknown_game_queries() {
        let machine = GameStateMachine::default();

        assert_eq!(machine.get_game(5), Game::default());
        assert!(machine.roster(5).is_empty());
        assert!(machine.current_player(5).is_none());
        assert!(machine.actions(5).is_empty());
    }
}
