use crate::context::GameContext;
use crate::error::GameResult;
use crate::prompts;

use super::{EndGame, GameState, StateKind, Transition};

/// The narrative loop: the assistant narrates, the player answers.
///
/// Runs every exchange of the scene within a single action and only hands
/// control back once the player quits.
#[derive(Debug, Default)]
pub struct PlayScene {
    turns: u32,
}

impl PlayScene {
    /// A scene that has not started yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Player turns taken so far.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    fn narrate(ctx: &mut GameContext, message: &str) -> GameResult<()> {
        let reply = ctx.narrate(message)?;
        ctx.emit(&format!("\n\n=> {reply}\n\n"));
        Ok(())
    }

    fn read_command(&self, ctx: &mut GameContext) -> GameResult<String> {
        loop {
            let input = ctx.prompt(&format!(">{}> ", self.turns))?;
            let input = input.trim();
            if !input.is_empty() {
                return Ok(input.to_string());
            }
        }
    }
}

impl GameState for PlayScene {
    fn kind(&self) -> StateKind {
        StateKind::PlayScene
    }

    fn act(&mut self, ctx: &mut GameContext) -> GameResult<Transition> {
        let opening = prompts::opening_scene(ctx.world());
        Self::narrate(ctx, &opening)?;

        loop {
            let command = self.read_command(ctx)?;
            if ctx.is_quit(&command) {
                break;
            }
            Self::narrate(ctx, &command)?;
            self.turns += 1;
        }

        tracing::info!(turns = self.turns, "scene finished");
        Ok(Transition::to(EndGame::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::state::test_support;
    use serde_json::json;
    use sr_assistant::testing::ScriptedBackend;

    #[test]
    fn opening_then_quit() {
        let backend = ScriptedBackend::new();
        backend.reply("Rain hammers the neon.");
        let (mut ctx, transcript) = test_support::context(&backend, ["q"]);
        let mut scene = PlayScene::new();

        let next = scene.act(&mut ctx).unwrap();

        assert!(matches!(next, Transition::Next(ref s) if s.kind() == StateKind::EndGame));
        assert_eq!(transcript.lines(), ["\n\n=> Rain hammers the neon.\n\n", ">0> "]);
        assert_eq!(scene.turns(), 0);
    }

    #[test]
    fn exchanges_until_quit_and_reprompts_on_empty() {
        let backend = ScriptedBackend::new();
        backend.reply("Opening.");
        backend.reply("The fixer slides a chip across the bar.");
        let (mut ctx, transcript) = test_support::context(&backend, ["", "  ", "talk to the fixer", "q"]);
        let mut scene = PlayScene::new();

        scene.act(&mut ctx).unwrap();

        assert_eq!(
            transcript.lines(),
            [
                "\n\n=> Opening.\n\n",
                ">0> ",
                ">0> ",
                ">0> ",
                "\n\n=> The fixer slides a chip across the bar.\n\n",
                ">1> ",
            ]
        );
        let sent: Vec<_> = backend.messages().into_iter().map(|(_, m)| m).collect();
        assert_eq!(sent[1], "talk to the fixer");
        assert_eq!(scene.turns(), 1);
    }

    #[test]
    fn opening_lists_employment_locations() {
        let backend = ScriptedBackend::new();
        backend.reply("Opening.");
        let (mut ctx, _) = test_support::context(&backend, ["q"]);
        ctx.world_mut()
            .register_locations(&json!({
                "locations": [
                    { "name": "Dante's Inferno", "type": "Employment", "description": "Club" },
                    { "name": "Touristville", "type": "Leisure", "description": "Tourist trap" },
                ]
            }))
            .unwrap();

        PlayScene::new().act(&mut ctx).unwrap();

        let (_, opening) = &backend.messages()[0];
        assert!(opening.contains("- Dante's Inferno - Club"));
        assert!(!opening.contains("Touristville"));
    }

    #[test]
    fn missing_reply_ends_the_scene_with_an_error() {
        let backend = ScriptedBackend::new();
        let (mut ctx, _) = test_support::context(&backend, ["q"]);

        let err = PlayScene::new().act(&mut ctx).unwrap_err();

        assert!(matches!(err, GameError::Backend(_)));
    }
}
