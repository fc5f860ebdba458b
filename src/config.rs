use tracing::debug;

use crate::game::SessionRules;

/// Runtime settings for the session service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub max_players: usize,
    pub min_players_to_start: usize,
    pub not_started_threshold: usize,
    pub event_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_players: 10,
            min_players_to_start: 2,
            not_started_threshold: 3,
            event_capacity: 100,
        }
    }
}

impl ServiceConfig {
    /// Reads settings from the environment, keeping the default for any
    /// variable that is unset or does not parse
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: usize| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        let mut config = Self {
            max_players: read("TURNKEEPER_MAX_PLAYERS", defaults.max_players),
            min_players_to_start: read(
                "TURNKEEPER_MIN_PLAYERS_TO_START",
                defaults.min_players_to_start,
            ),
            not_started_threshold: read(
                "TURNKEEPER_NOT_STARTED_THRESHOLD",
                defaults.not_started_threshold,
            ),
            event_capacity: read("TURNKEEPER_EVENT_CAPACITY", defaults.event_capacity),
        };

        let rules = SessionRules::from(&config).validated();
        config.max_players = rules.max_players;
        config.min_players_to_start = rules.min_players_to_start;

        debug!(config = ?config, "Loaded service configuration");
        config
    }
}
