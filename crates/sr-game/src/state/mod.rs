//! The game's states and the transitions between them.
//!
//! ```text
//! StartGame ──▶ InitializeGameWorld ──▶ WaitForGameWorldReady ──▶ PlayScene ──▶ EndGame
//!     │                                      ▲        │
//!     │                                      └────────┘
//!     └──────────────────────────────────────────────────────────────────────▶ EndGame
//! ```

mod end_game;
mod initialize_world;
mod play_scene;
mod start_game;

use std::fmt;

use crate::context::GameContext;
use crate::error::GameResult;

pub use end_game::EndGame;
pub use initialize_world::{InitializeGameWorld, WaitForGameWorldReady};
pub use play_scene::PlayScene;
pub use start_game::StartGame;

/// Which state a [`GameState`] is. Two states are the same state when
/// their kinds are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Title screen.
    StartGame,
    /// Fanning out world generation requests.
    InitializeGameWorld,
    /// Polling until the generated world is complete.
    WaitForGameWorldReady,
    /// The interactive narrative loop.
    PlayScene,
    /// The session is over.
    EndGame,
}

impl StateKind {
    /// Name used in logs and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartGame => "StartGame",
            Self::InitializeGameWorld => "InitializeGameWorld",
            Self::WaitForGameWorldReady => "WaitForGameWorldReady",
            Self::PlayScene => "PlayScene",
            Self::EndGame => "EndGame",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a state wants the driver to do after it acted.
#[derive(Debug)]
pub enum Transition {
    /// Remain in the current state.
    Stay,
    /// Install this state as current.
    Next(Box<dyn GameState>),
}

impl Transition {
    /// Move on to `state`.
    pub fn to(state: impl GameState + 'static) -> Self {
        Self::Next(Box::new(state))
    }
}

/// One phase of a play session.
pub trait GameState: fmt::Debug {
    /// Identity of this state.
    fn kind(&self) -> StateKind;

    /// Perform this state's side effects and say where to go next.
    fn act(&mut self, ctx: &mut GameContext) -> GameResult<Transition>;

    /// Whether the session ends once this state is current.
    fn is_terminal(&self) -> bool {
        false
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use sr_assistant::MessageBus;
    use sr_assistant::testing::ScriptedBackend;

    use crate::config::GameConfig;
    use crate::console::{MemoryConsole, Transcript};
    use crate::context::GameContext;

    /// A context wired to a scripted backend, with zero poll delay.
    pub(crate) fn context<I, S>(
        backend: &ScriptedBackend,
        inputs: I,
    ) -> (GameContext, Transcript)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = MemoryConsole::new(inputs);
        let transcript = console.transcript();
        let config = GameConfig::default().with_poll_delay(Duration::ZERO);
        let mut ctx = GameContext::new(Box::new(console), config);
        ctx.set_message_bus(MessageBus::new(Box::new(backend.clone()), "asst_test"))
            .unwrap();
        (ctx, transcript)
    }
}
