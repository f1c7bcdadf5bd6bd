use crate::context::GameContext;
use crate::error::GameResult;

use super::{EndGame, GameState, InitializeGameWorld, StateKind, Transition};

const BANNER: &str = "\
==============================================
               S P R A W L   R U N N E R
   a consensual hallucination text adventure
==============================================";

/// Title screen: start a new game or quit.
#[derive(Debug, Default)]
pub struct StartGame;

impl StartGame {
    /// The title screen.
    pub fn new() -> Self {
        Self
    }
}

impl GameState for StartGame {
    fn kind(&self) -> StateKind {
        StateKind::StartGame
    }

    fn act(&mut self, ctx: &mut GameContext) -> GameResult<Transition> {
        ctx.emit(BANNER);
        let quit = ctx.config().quit_command.clone();
        let input = ctx.prompt(&format!("Press Enter to start, {quit} to quit: "))?;

        if ctx.is_quit(&input) {
            Ok(Transition::to(EndGame::new()))
        } else {
            Ok(Transition::to(InitializeGameWorld::new()))
        }
    }
}
