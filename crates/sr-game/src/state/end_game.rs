use crate::context::GameContext;
use crate::error::GameResult;

use super::{GameState, StateKind, Transition};

/// The terminal state.
///
/// It only becomes terminal after acting once, so the driver always runs
/// its action before the loop ends.
#[derive(Debug, Default)]
pub struct EndGame {
    finished: bool,
}

impl EndGame {
    /// A fresh, not yet terminal end state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameState for EndGame {
    fn kind(&self) -> StateKind {
        StateKind::EndGame
    }

    fn act(&mut self, ctx: &mut GameContext) -> GameResult<Transition> {
        if !self.finished {
            ctx.emit("Jacking out. See you in the Sprawl, runner.");
            self.finished = true;
        }
        Ok(Transition::Stay)
    }

    fn is_terminal(&self) -> bool {
        self.finished
    }
}
