use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::events::GameEvent;

/// Errors that can occur when handling events
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler failed: {0}")]
    Failed(String),
}

impl EventError {
    pub fn failed(msg: impl Into<String>) -> Self {
        EventError::Failed(msg.into())
    }
}

/// Trait for components that observe game notifications
///
/// Handlers run outside the service lock. A failing handler never affects
/// the transition that produced the event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle a game event
    async fn handle(&self, event: &GameEvent) -> Result<(), EventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// Writes every event to the tracing log
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn handle(&self, event: &GameEvent) -> Result<(), EventError> {
        info!(
            game_id = event.game_id(),
            event_type = event.event_type(),
            event = ?event,
            "Game event"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LoggingEventHandler"
    }
}
