use serde::{Deserialize, Serialize};

use crate::game::{ActionPayload, GameId};

/// Commands accepted on the line protocol
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    CreateGame,
    JoinGame,
    StartGame,
    SubmitAction,
    EndGame,
    GetGameState,
    GetActiveGames,
    GetNotStartedGames,
    GetRoster,
    GetActions,
}

/// One request line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    pub command_type: CommandType,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CommandMessage {
    pub fn new(command_type: CommandType, payload: serde_json::Value) -> Self {
        Self {
            command_type,
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    Ok,
    Error,
}

/// One response line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub payload: serde_json::Value,
}

impl ResponseMessage {
    pub fn ok(payload: serde_json::Value) -> Self {
        Self {
            response_type: ResponseType::Ok,
            payload,
        }
    }

    pub fn error(code: &str, message: String) -> Self {
        let payload = ErrorPayload {
            code: code.to_string(),
            message,
        };
        Self {
            response_type: ResponseType::Error,
            payload: serde_json::json!(payload),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.response_type == ResponseType::Ok
    }
}

/// Request payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGamePayload {
    pub creator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGamePayload {
    pub game_id: GameId,
    pub player: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameIdPayload {
    pub game_id: GameId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitActionPayload {
    pub game_id: GameId,
    pub action: ActionPayload,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndGamePayload {
    pub game_id: GameId,
    pub actor: String,
}

/// Response payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCreatedPayload {
    pub game_id: GameId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameListPayload {
    pub game_ids: Vec<GameId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPayload {
    pub game_id: GameId,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}
