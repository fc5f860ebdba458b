use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sequential game identifier, the first game is 1
pub type GameId = u64;

/// Stored record for one game session
///
/// Unknown identifiers resolve to `Game::default()`, a zero record with
/// `id == 0` and every flag false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub is_active: bool,
    pub current_player_index: usize,
    pub last_action_timestamp: DateTime<Utc>,
    pub turn_count: u64,
    /// Reserved for reversible turn order, rotation is always forward
    pub direction_clockwise: bool,
    pub is_started: bool,
}

impl Game {
    /// A freshly created game: active, not started, first seat to act
    pub fn new(id: GameId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            is_active: true,
            current_player_index: 0,
            last_action_timestamp: now,
            turn_count: 0,
            direction_clockwise: true,
            is_started: false,
        }
    }

    pub fn state(&self) -> GameState {
        GameState {
            is_active: self.is_active,
            current_player_index: self.current_player_index,
            last_action_timestamp: self.last_action_timestamp,
            turn_count: self.turn_count,
            direction_clockwise: self.direction_clockwise,
            is_started: self.is_started,
        }
    }
}

/// Public summary returned by `get_game_state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub is_active: bool,
    pub current_player_index: usize,
    pub last_action_timestamp: DateTime<Utc>,
    pub turn_count: u64,
    pub direction_clockwise: bool,
    pub is_started: bool,
}

/// One recorded turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub player: String,
    pub payload: ActionPayload,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadParseError {
    #[error("Action payload must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Invalid hex digit in action payload: {0:?}")]
    InvalidDigit(char),
}

/// Opaque 32-byte action token
///
/// The meaning belongs to the caller (a hash of a card play, a move encoding,
/// etc). It is written and parsed as 64 lowercase hex characters, with an
/// optional `0x` prefix accepted on input.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionPayload([u8; ActionPayload::LEN]);

impl ActionPayload {
    pub const LEN: usize = 32;

    pub fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl From<[u8; ActionPayload::LEN]> for ActionPayload {
    fn from(bytes: [u8; ActionPayload::LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ActionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ActionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionPayload(0x{})", self)
    }
}

impl FromStr for ActionPayload {
    type Err = PayloadParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        let chars: Vec<char> = digits.chars().collect();
        if chars.len() != Self::LEN * 2 {
            return Err(PayloadParseError::InvalidLength {
                expected: Self::LEN * 2,
                actual: chars.len(),
            });
        }

        let mut bytes = [0u8; Self::LEN];
        for (i, pair) in chars.chunks(2).enumerate() {
            let hi = pair[0].to_digit(16).ok_or(PayloadParseError::InvalidDigit(pair[0]))?;
            let lo = pair[1].to_digit(16).ok_or(PayloadParseError::InvalidDigit(pair[1]))?;
            bytes[i] = (hi * 16 + lo) as u8;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for ActionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self))
    }
}

impl<'de> Deserialize<'de> for ActionPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
