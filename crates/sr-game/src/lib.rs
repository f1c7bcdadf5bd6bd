//! Game state machine and driver for Sprawl Runner.
//!
//! A [`Game`] holds exactly one current [`GameState`] and repeatedly asks
//! it to act. States talk to the player through a [`Console`], fan
//! generation requests out to the assistant through the message bus, and
//! hand back the next state. The world the assistant generates lands in a
//! [`sr_core::GameWorld`] via tool calls.

pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod game;
pub mod prompts;
pub mod state;
pub mod summary;
pub mod tools;

pub use config::GameConfig;
pub use console::{Console, MemoryConsole, Transcript};
pub use context::GameContext;
pub use error::{GameError, GameResult};
pub use game::Game;
pub use state::{
    EndGame, GameState, InitializeGameWorld, PlayScene, StartGame, StateKind, Transition,
    WaitForGameWorldReady,
};
