// Notification plumbing
//
// Accepted transitions publish a GameEvent on the EventBus. Observers either
// hold a broadcast receiver directly or register an EventHandler through a
// GameSubscription.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::GameEvent;
pub use handler::{EventError, EventHandler, LoggingEventHandler};
pub use subscription::GameSubscription;

// Internal modules
mod bus;
mod events;
mod handler;
mod subscription;
