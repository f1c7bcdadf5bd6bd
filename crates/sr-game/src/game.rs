//! The game driver.

use sr_assistant::MessageBus;
use sr_core::GameWorld;

use crate::config::GameConfig;
use crate::console::Console;
use crate::context::GameContext;
use crate::error::{GameError, GameResult};
use crate::state::{GameState, StateKind, Transition};

/// Shown to the player when the stuck limit trips.
pub const STUCK_MESSAGE: &str =
    "The game is not making progress and has to stop. Please try again later.";

/// Owns the current state and runs the transition loop.
#[derive(Debug)]
pub struct Game {
    context: GameContext,
    state: Option<Box<dyn GameState>>,
    idle_transitions: u32,
}

impl Game {
    /// A game with no state installed and no message bus bound.
    pub fn new(console: Box<dyn Console>, config: GameConfig) -> Self {
        Self {
            context: GameContext::new(console, config),
            state: None,
            idle_transitions: 0,
        }
    }

    /// Bind the message bus. Fails if one is already bound.
    pub fn set_message_bus(&mut self, bus: MessageBus<GameWorld>) -> GameResult<()> {
        self.context.set_message_bus(bus)
    }

    /// The bound message bus, if any.
    pub fn message_bus(&self) -> Option<&MessageBus<GameWorld>> {
        self.context.message_bus()
    }

    /// Check the game is wired up well enough to play.
    pub fn validate(&self) -> GameResult<()> {
        if !self.context.has_message_bus() {
            return Err(GameError::Configuration(
                "message bus must be set before play".to_string(),
            ));
        }
        Ok(())
    }

    /// Install `state` as current and reset the stuck counter.
    ///
    /// States are owned, so a state handed in here is never the one
    /// already installed. Staying put is [`Transition::Stay`], which never
    /// reaches this method.
    pub fn change_state(&mut self, state: Box<dyn GameState>) {
        tracing::info!(
            from = self.state_kind().map_or("none", StateKind::as_str),
            to = %state.kind(),
            "changing state"
        );
        self.state = Some(state);
        self.idle_transitions = 0;
    }

    /// Let the current state act once and apply the transition it asks for.
    pub fn transition(&mut self) -> GameResult<()> {
        let mut state = self.state.take().ok_or_else(no_state)?;
        let outcome = state.act(&mut self.context);
        self.state = Some(state);

        self.idle_transitions = self.idle_transitions.saturating_add(1);
        if let Transition::Next(next) = outcome? {
            self.change_state(next);
        }
        Ok(())
    }

    /// Run transitions until the current state is terminal.
    ///
    /// Fails without touching the console when no state is installed or no
    /// message bus is bound. Trips the stuck limit once more than
    /// [`GameConfig::stuck_limit`] transitions in a row leave the state
    /// unchanged; the player is told before the error is returned.
    pub fn play(&mut self) -> GameResult<()> {
        if self.state.is_none() {
            return Err(no_state());
        }
        self.validate()?;

        while !self.is_finished() {
            self.transition()?;
            if self.idle_transitions > self.context.config().stuck_limit {
                tracing::error!(
                    state = ?self.state_kind(),
                    transitions = self.idle_transitions,
                    "stuck loop detected"
                );
                self.emit(STUCK_MESSAGE);
                return Err(GameError::Stuck {
                    transitions: self.idle_transitions,
                });
            }
        }
        Ok(())
    }

    /// Whether the current state is terminal.
    pub fn is_finished(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.is_terminal())
    }

    /// Kind of the current state, if one is installed.
    pub fn state_kind(&self) -> Option<StateKind> {
        self.state.as_ref().map(|s| s.kind())
    }

    /// Consecutive transitions that left the state unchanged.
    pub fn idle_transitions(&self) -> u32 {
        self.idle_transitions
    }

    /// Show text to the player.
    pub fn emit(&mut self, text: &str) {
        self.context.emit(text);
    }

    /// The world generated so far.
    pub fn world(&self) -> &GameWorld {
        self.context.world()
    }

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        self.context.config()
    }
}

fn no_state() -> GameError {
    GameError::Configuration("no game state installed".to_string())
}
