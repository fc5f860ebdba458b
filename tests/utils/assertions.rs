//! Test assertion helpers - fluent API for verifying emitted events
#![allow(dead_code)] // Test utilities may not all be used in every test

use tokio::sync::broadcast::error::TryRecvError;

use turnkeeper::GameEvent;

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct EventAssertion<'a> {
    setup: &'a mut TestSetup,
}

impl<'a> EventAssertion<'a> {
    pub fn new(setup: &'a mut TestSetup) -> Self {
        Self { setup }
    }

    /// Assert the next queued event equals `expected` (consumes it)
    pub fn next_is(self, expected: GameEvent) -> Self {
        let event = self
            .setup
            .events
            .try_recv()
            .unwrap_or_else(|e| panic!("expected {:?}, got {:?}", expected, e));
        assert_eq!(event, expected, "received wrong event");
        self
    }

    /// Assert the next queued event has the given type (consumes it)
    pub fn next_type_is(self, event_type: &str) -> Self {
        let event = self
            .setup
            .events
            .try_recv()
            .unwrap_or_else(|e| panic!("expected {} event, got {:?}", event_type, e));
        assert_eq!(event.event_type(), event_type, "received wrong event type");
        self
    }

    /// Assert nothing else is queued
    pub fn no_more(self) {
        match self.setup.events.try_recv() {
            Err(TryRecvError::Empty) => {}
            other => panic!("expected no more events, got {:?}", other),
        }
    }
}
