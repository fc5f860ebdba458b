use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::messages::{
    CommandMessage, CommandType, CreateGamePayload, EndGamePayload, GameCreatedPayload,
    GameIdPayload, GameListPayload, JoinGamePayload, ResponseMessage, RosterPayload,
    SubmitActionPayload,
};
use crate::game::GameService;
use crate::shared::AppError;

/// Turns protocol lines into service calls
pub struct CommandHandler {
    service: GameService,
}

impl CommandHandler {
    pub fn new(service: GameService) -> Self {
        Self { service }
    }

    /// Parses one request line and returns the response to write back
    pub async fn handle_line(&self, line: &str) -> ResponseMessage {
        debug!(line = %line, "Received command");

        let result = match serde_json::from_str::<CommandMessage>(line) {
            Ok(message) => self.execute(message).await,
            Err(e) => {
                warn!(error = %e, "Failed to parse command");
                Err(AppError::from(e))
            }
        };

        match result {
            Ok(payload) => ResponseMessage::ok(payload),
            Err(e) => ResponseMessage::error(e.code(), e.to_string()),
        }
    }

    /// Runs a parsed command against the service
    pub async fn execute(&self, message: CommandMessage) -> Result<Value, AppError> {
        info!(command = ?message.command_type, "Executing command");

        match message.command_type {
            CommandType::CreateGame => {
                let payload: CreateGamePayload = parse_payload(message.payload)?;
                let game_id = self.service.create_game(&payload.creator).await;
                to_value(GameCreatedPayload { game_id })
            }
            CommandType::JoinGame => {
                let payload: JoinGamePayload = parse_payload(message.payload)?;
                self.service
                    .join_game(payload.game_id, &payload.player)
                    .await?;
                Ok(Value::Null)
            }
            CommandType::StartGame => {
                let payload: GameIdPayload = parse_payload(message.payload)?;
                self.service.start_game(payload.game_id).await?;
                Ok(Value::Null)
            }
            CommandType::SubmitAction => {
                let payload: SubmitActionPayload = parse_payload(message.payload)?;
                self.service
                    .submit_action(payload.game_id, payload.action, &payload.actor)
                    .await?;
                Ok(Value::Null)
            }
            CommandType::EndGame => {
                let payload: EndGamePayload = parse_payload(message.payload)?;
                self.service
                    .end_game(payload.game_id, &payload.actor)
                    .await?;
                Ok(Value::Null)
            }
            CommandType::GetGameState => {
                let payload: GameIdPayload = parse_payload(message.payload)?;
                to_value(self.service.get_game_state(payload.game_id).await)
            }
            CommandType::GetActiveGames => to_value(GameListPayload {
                game_ids: self.service.get_active_games().await,
            }),
            CommandType::GetNotStartedGames => to_value(GameListPayload {
                game_ids: self.service.get_not_started_games().await,
            }),
            CommandType::GetRoster => {
                let payload: GameIdPayload = parse_payload(message.payload)?;
                to_value(RosterPayload {
                    game_id: payload.game_id,
                    players: self.service.get_roster(payload.game_id).await,
                })
            }
            CommandType::GetActions => {
                let payload: GameIdPayload = parse_payload(message.payload)?;
                to_value(self.service.get_actions(payload.game_id).await)
            }
        }
    }
}

fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T, AppError> {
    serde_json::from_value(payload).map_err(|e| AppError::BadRequest(format!("Invalid payload: {}", e)))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| {
        warn!(error = %e, "Failed to serialize response");
        AppError::Internal
    })
}
