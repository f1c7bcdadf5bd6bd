use std::thread;

use crate::context::GameContext;
use crate::error::GameResult;
use crate::prompts;
use crate::summary;

use super::{GameState, PlayScene, StateKind, Transition};

/// Fans out the faction and location generation requests.
#[derive(Debug, Default)]
pub struct InitializeGameWorld;

impl InitializeGameWorld {
    /// The world generation kickoff.
    pub fn new() -> Self {
        Self
    }
}

impl GameState for InitializeGameWorld {
    fn kind(&self) -> StateKind {
        StateKind::InitializeGameWorld
    }

    fn act(&mut self, ctx: &mut GameContext) -> GameResult<Transition> {
        ctx.submit(prompts::FACTION_GENERATION)?;
        ctx.submit(prompts::LOCATION_GENERATION)?;
        Ok(Transition::to(WaitForGameWorldReady::new()))
    }
}

/// Polls the generation requests until the world holds enough entities.
///
/// Readiness is a plain count of factions plus locations against
/// [`crate::GameConfig::expected_entities`]. A backend that never calls the
/// tools keeps this state current until the driver's stuck limit trips.
#[derive(Debug, Default)]
pub struct WaitForGameWorldReady;

impl WaitForGameWorldReady {
    /// The readiness poller.
    pub fn new() -> Self {
        Self
    }
}

impl GameState for WaitForGameWorldReady {
    fn kind(&self) -> StateKind {
        StateKind::WaitForGameWorldReady
    }

    fn act(&mut self, ctx: &mut GameContext) -> GameResult<Transition> {
        ctx.drain_pending()?;

        let total = ctx.world().entity_count();
        ctx.emit(&format!("... waiting for game world initialization: {total} ..."));

        if total >= ctx.config().expected_entities {
            tracing::info!(entities = total, "game world ready");
            let overview = summary::world_summary(ctx.world());
            ctx.emit(&overview);
            return Ok(Transition::to(PlayScene::new()));
        }

        tracing::debug!(
            entities = total,
            pending = ctx.pending_requests(),
            "game world not ready"
        );
        let delay = ctx.config().poll_delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        Ok(Transition::Stay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;
    use serde_json::{Value, json};
    use sr_assistant::testing::{ScriptStep, ScriptedBackend};
    use sr_assistant::{RunStatus, ToolCall};

    fn factions(count: usize) -> Value {
        let list: Vec<_> = (0..count)
            .map(|i| json!({ "name": format!("Faction {i}"), "description": "d", "motivation": "m" }))
            .collect();
        json!({ "factions": list })
    }

    fn locations(count: usize) -> Value {
        let list: Vec<_> = (0..count)
            .map(|i| json!({ "name": format!("Place {i}"), "type": "Employment", "description": "d" }))
            .collect();
        json!({ "locations": list })
    }

    #[test]
    fn initialize_submits_both_requests() {
        let backend = ScriptedBackend::new();
        let (mut ctx, _) = test_support::context(&backend, Vec::<String>::new());

        let next = InitializeGameWorld::new().act(&mut ctx).unwrap();

        assert!(matches!(next, Transition::Next(ref s) if s.kind() == StateKind::WaitForGameWorldReady));
        assert_eq!(ctx.pending_requests(), 2);
        let sent: Vec<_> = backend.messages().into_iter().map(|(_, m)| m).collect();
        assert_eq!(sent, [prompts::FACTION_GENERATION, prompts::LOCATION_GENERATION]);
    }

    #[test]
    fn partial_world_keeps_waiting() {
        let backend = ScriptedBackend::new();
        let (mut ctx, transcript) = test_support::context(&backend, Vec::<String>::new());
        ctx.world_mut().register_factions(&factions(3)).unwrap();
        ctx.world_mut().register_locations(&locations(2)).unwrap();

        let next = WaitForGameWorldReady::new().act(&mut ctx).unwrap();

        assert!(matches!(next, Transition::Stay));
        assert_eq!(
            transcript.lines(),
            ["... waiting for game world initialization: 5 ..."]
        );
    }

    #[test]
    fn complete_world_advances_to_play() {
        let backend = ScriptedBackend::new();
        let (mut ctx, transcript) = test_support::context(&backend, Vec::<String>::new());
        ctx.world_mut().register_factions(&factions(5)).unwrap();
        ctx.world_mut().register_locations(&locations(3)).unwrap();

        let next = WaitForGameWorldReady::new().act(&mut ctx).unwrap();

        assert!(matches!(next, Transition::Next(ref s) if s.kind() == StateKind::PlayScene));
        assert!(transcript.contains("initialization: 8"));
        assert!(transcript.contains("Faction 4"));
        assert!(transcript.contains("Place 2"));
    }

    #[test]
    fn tool_calls_fill_the_world_while_waiting() {
        let backend = ScriptedBackend::new();
        backend.script_run([
            ScriptStep::Status(RunStatus::InProgress),
            ScriptStep::ToolCalls(vec![ToolCall::new(
                "call_f",
                "register_factions",
                factions(5).to_string(),
            )]),
        ]);
        backend.script_run([ScriptStep::ToolCalls(vec![ToolCall::new(
            "call_l",
            "register_locations",
            locations(3).to_string(),
        )])]);
        let (mut ctx, transcript) = test_support::context(&backend, Vec::<String>::new());
        InitializeGameWorld::new().act(&mut ctx).unwrap();
        let mut waiting = WaitForGameWorldReady::new();

        assert!(matches!(waiting.act(&mut ctx).unwrap(), Transition::Stay));
        assert_eq!(ctx.world().locations().len(), 3);
        assert!(ctx.world().factions().is_empty());

        let next = waiting.act(&mut ctx).unwrap();
        assert!(matches!(next, Transition::Next(_)));
        assert_eq!(ctx.world().entity_count(), 8);
        assert_eq!(transcript.lines()[0], "... waiting for game world initialization: 3 ...");
        assert_eq!(transcript.lines()[1], "... waiting for game world initialization: 8 ...");
    }

    #[test]
    fn bad_payload_does_not_block_the_world() {
        let backend = ScriptedBackend::new();
        backend.script_run([ScriptStep::ToolCalls(vec![ToolCall::new(
            "call_bad",
            "register_factions",
            "{\"wrong\": []}",
        )])]);
        let (mut ctx, _) = test_support::context(&backend, Vec::<String>::new());
        ctx.submit("factions").unwrap();

        let next = WaitForGameWorldReady::new().act(&mut ctx).unwrap();

        assert!(matches!(next, Transition::Stay));
        let submitted = backend.submitted_outputs();
        assert_eq!(submitted[0].1[0].output, sr_assistant::TOOL_ERROR);
        assert!(ctx.world().is_empty());
    }
}
