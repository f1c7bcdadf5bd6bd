//! Everything a state can touch while it acts.

use std::cell::OnceCell;

use sr_assistant::MessageBus;
use sr_core::GameWorld;

use crate::config::GameConfig;
use crate::console::Console;
use crate::error::{GameError, GameResult};
use crate::tools;

/// The driver's resources, lent to the current state on every transition.
///
/// States never reach back into the driver. They read and write the world,
/// talk to the player, and queue work on the message bus through here, and
/// report where to go next through their return value.
#[derive(Debug)]
pub struct GameContext {
    console: Box<dyn Console>,
    world: GameWorld,
    bus: OnceCell<MessageBus<GameWorld>>,
    config: GameConfig,
}

impl GameContext {
    /// A context with an empty world and no message bus yet.
    pub fn new(console: Box<dyn Console>, config: GameConfig) -> Self {
        Self {
            console,
            world: GameWorld::new(),
            bus: OnceCell::new(),
            config,
        }
    }

    /// Bind the message bus. Only one bus can ever be bound.
    ///
    /// The world registration tools are installed on the bus and its
    /// narrative poll interval is aligned with the configured poll delay.
    pub fn set_message_bus(&mut self, bus: MessageBus<GameWorld>) -> GameResult<()> {
        let mut bus = bus.with_poll_interval(self.config.poll_delay);
        bus.register_handlers(tools::world_handlers());
        self.bus
            .set(bus)
            .map_err(|_| GameError::Configuration("message bus is already set".to_string()))
    }

    /// The bound message bus, if any.
    pub fn message_bus(&self) -> Option<&MessageBus<GameWorld>> {
        self.bus.get()
    }

    /// Whether a message bus has been bound.
    pub fn has_message_bus(&self) -> bool {
        self.bus.get().is_some()
    }

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The world generated so far.
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    /// Show text to the player.
    pub fn emit(&mut self, text: &str) {
        self.console.emit(text);
    }

    /// Read one line from the player.
    pub fn player_input(&mut self) -> GameResult<String> {
        Ok(self.console.get_player_input()?)
    }

    /// Show a prompt and read the player's answer.
    pub fn prompt(&mut self, text: &str) -> GameResult<String> {
        Ok(self.console.prompt(text)?)
    }

    /// Whether `input` is the quit command.
    pub fn is_quit(&self, input: &str) -> bool {
        self.config.is_quit(input)
    }

    /// Fan out a generation request without waiting for it.
    pub fn submit(&mut self, content: &str) -> GameResult<()> {
        Ok(self.bus_mut()?.submit(content)?)
    }

    /// Reconcile every in-flight generation request once.
    pub fn drain_pending(&mut self) -> GameResult<()> {
        let bus = self.bus.get_mut().ok_or_else(unbound)?;
        Ok(bus.drain_pending(&mut self.world)?)
    }

    /// Number of generation requests still in flight.
    pub fn pending_requests(&self) -> usize {
        self.bus.get().map_or(0, MessageBus::pending_len)
    }

    /// Send a narrative message and wait for the assistant's reply.
    pub fn narrate(&mut self, content: &str) -> GameResult<String> {
        let bus = self.bus.get_mut().ok_or_else(unbound)?;
        Ok(bus.narrate(&mut self.world, content)?)
    }

    fn bus_mut(&mut self) -> GameResult<&mut MessageBus<GameWorld>> {
        self.bus.get_mut().ok_or_else(unbound)
    }
}

fn unbound() -> GameError {
    GameError::Configuration("message bus has not been set".to_string())
}
