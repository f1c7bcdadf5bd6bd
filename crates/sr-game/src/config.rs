//! Tunables for a play session.

use std::time::Duration;

/// Configuration for a play session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Factions plus locations the world needs before play can start.
    pub expected_entities: usize,
    /// Delay between polls while waiting on the world or a narrative reply.
    pub poll_delay: Duration,
    /// Consecutive transitions without a state change before giving up.
    pub stuck_limit: u32,
    /// Input that quits from any interactive state.
    pub quit_command: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            expected_entities: 8,
            poll_delay: Duration::from_secs(2),
            stuck_limit: 15,
            quit_command: "q".to_string(),
        }
    }
}

impl GameConfig {
    /// Set how many entities make the world ready.
    pub fn with_expected_entities(mut self, count: usize) -> Self {
        self.expected_entities = count;
        self
    }

    /// Set the delay between polls.
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    /// Set the stuck-loop limit (at least 1).
    pub fn with_stuck_limit(mut self, limit: u32) -> Self {
        self.stuck_limit = limit.max(1);
        self
    }

    /// Set the quit command.
    pub fn with_quit_command(mut self, command: impl Into<String>) -> Self {
        self.quit_command = command.into();
        self
    }

    /// Whether `input` is the quit command (surrounding whitespace and case ignored).
    pub fn is_quit(&self, input: &str) -> bool {
        input.trim().eq_ignore_ascii_case(&self.quit_command)
    }
}
