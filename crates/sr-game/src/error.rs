//! Error types for the game driver.

use thiserror::Error;

use sr_assistant::AssistantError;

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Everything that can end a play session.
///
/// Tool calls the assistant makes with bad payloads are not in here: the
/// message bus answers them with `"ERROR"` and play continues.
#[derive(Debug, Error)]
pub enum GameError {
    /// The game was wired incorrectly before or during play.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Reading player input failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Too many transitions in a row left the current state unchanged.
    #[error("no progress after {transitions} transitions")]
    Stuck {
        /// Consecutive transitions that did not change the state.
        transitions: u32,
    },

    /// Talking to the assistant backend failed.
    #[error("{0}")]
    Backend(#[from] AssistantError),
}

impl GameError {
    /// Whether the driver already told the player about this error.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Stuck { .. })
    }
}
