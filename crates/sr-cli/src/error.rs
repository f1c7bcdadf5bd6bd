//! Errors that end the program, and how they reach the player.

use sr_game::{Console, GameError};
use thiserror::Error;

/// Anything that stops a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings, file system, or argument problems, shown verbatim.
    #[error("{0}")]
    Message(String),

    /// The game session failed.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl CliError {
    /// Whether the player has already seen this error.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Game(e) if e.is_reported())
    }
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

/// Show an unreported error on the console and pick the process exit status.
pub fn exit_status(result: Result<(), CliError>, console: &mut dyn Console) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(reported = e.is_reported(), "command failed: {e}");
            if !e.is_reported() {
                console.emit(&e.to_string());
            }
            1
        }
    }
}
