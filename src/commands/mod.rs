// Line-oriented JSON command protocol
//
// Each request is one JSON object on its own line, `{"type": ..., "payload": ...}`,
// and each gets exactly one response line back.

// Public API - what other modules can use
pub use handler::CommandHandler;
pub use messages::{CommandMessage, CommandType, ResponseMessage, ResponseType};

// Internal modules
mod handler;
pub mod messages;
