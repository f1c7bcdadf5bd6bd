//! Tool dispatch bus.
//!
//! Decouples issuing a generation request from observing its side effects.
//! [`MessageBus::submit`] fans requests out without waiting;
//! [`MessageBus::drain_pending`] later polls every in-flight run once,
//! answers any tool calls through the registered handlers, and keeps only
//! the runs that are still moving.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::backend::AssistantBackend;
use crate::error::{AssistantError, AssistantResult, ToolError};
use crate::run::{Run, RunStatus, ThreadId, ToolCall, ToolOutput};
use crate::tool::ToolName;

/// Output sent back for a tool call that could not be served.
pub const TOOL_ERROR: &str = "ERROR";

/// A local tool implementation.
///
/// Handlers operate on an explicit target (the game world) passed in by
/// the caller of [`MessageBus::drain_pending`] or [`MessageBus::narrate`],
/// and return the status string reported back to the assistant.
pub type ToolHandler<T> = fn(&mut T, &Value) -> Result<String, ToolError>;

/// Owns in-flight runs and routes their tool calls to local handlers.
pub struct MessageBus<T> {
    backend: Box<dyn AssistantBackend>,
    assistant_id: String,
    pending: VecDeque<Run>,
    handlers: HashMap<ToolName, ToolHandler<T>>,
    narrative_thread: Option<ThreadId>,
    poll_interval: Duration,
}

impl<T> MessageBus<T> {
    /// Create a bus that runs `assistant_id` on `backend`.
    pub fn new(backend: Box<dyn AssistantBackend>, assistant_id: impl Into<String>) -> Self {
        Self {
            backend,
            assistant_id: assistant_id.into(),
            pending: VecDeque::new(),
            handlers: HashMap::new(),
            narrative_thread: None,
            poll_interval: Duration::from_secs(1),
        }
    }

    /// Set the delay between polls while waiting on a narrative run.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The assistant runs are started against.
    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    /// Number of runs still awaiting reconciliation.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Snapshot of the pending queue, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Run> {
        self.pending.iter()
    }

    /// Install a handler. A later registration for the same tool wins.
    pub fn register_handler(&mut self, tool: ToolName, handler: ToolHandler<T>) {
        tracing::debug!(%tool, "registering tool handler");
        self.handlers.insert(tool, handler);
    }

    /// Install several handlers in order.
    pub fn register_handlers<I>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = (ToolName, ToolHandler<T>)>,
    {
        for (tool, handler) in handlers {
            self.register_handler(tool, handler);
        }
    }

    /// Whether a handler is installed for `tool`.
    pub fn has_handler(&self, tool: ToolName) -> bool {
        self.handlers.contains_key(&tool)
    }

    /// Start a generation request on a fresh thread without waiting for it.
    pub fn submit(&mut self, content: &str) -> AssistantResult<()> {
        let thread = self.backend.create_thread()?;
        self.backend.create_message(&thread, content)?;
        let run = self.backend.create_run(&thread, &self.assistant_id)?;
        tracing::info!(run = %run.id, thread = %run.thread_id, "submitted generation request");
        self.pending.push_back(run);
        Ok(())
    }

    /// Poll every run queued at entry once and reconcile it.
    ///
    /// Runs asking for tool outputs get them in one batch. Runs still
    /// queued, in progress, or cancelling go back on the queue; everything
    /// else is dropped. Runs re-queued during this pass are not polled again
    /// until the next call.
    pub fn drain_pending(&mut self, target: &mut T) -> AssistantResult<()> {
        let count = self.pending.len();
        tracing::debug!(count, "draining pending runs");

        for _ in 0..count {
            let Some(queued) = self.pending.pop_front() else {
                break;
            };
            let mut run = self
                .backend
                .retrieve_run(&queued.thread_id, &queued.id)?;

            if run.status == RunStatus::RequiresAction {
                let outputs = self.resolve_tool_calls(target, &run.tool_calls);
                run = self.send_tool_outputs(run, &outputs)?;
            }

            if run.status.is_pending() {
                self.pending.push_back(run);
            } else {
                tracing::debug!(run = %run.id, status = %run.status, "run settled");
            }
        }

        Ok(())
    }

    /// Answer each call in order with its handler's output, or [`TOOL_ERROR`].
    pub fn resolve_tool_calls(&self, target: &mut T, calls: &[ToolCall]) -> Vec<ToolOutput> {
        calls
            .iter()
            .map(|call| {
                let output = self.dispatch(target, call).unwrap_or_else(|e| {
                    tracing::warn!(call = %call.id, tool = %call.name, "tool call failed: {e}");
                    TOOL_ERROR.to_string()
                });
                ToolOutput {
                    tool_call_id: call.id.clone(),
                    output,
                }
            })
            .collect()
    }

    fn dispatch(&self, target: &mut T, call: &ToolCall) -> Result<String, ToolError> {
        let handler = ToolName::parse(&call.name)
            .and_then(|tool| self.handlers.get(&tool))
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;
        let arguments: Value = serde_json::from_str(&call.arguments)?;
        handler(target, &arguments)
    }

    fn send_tool_outputs(&self, run: Run, outputs: &[ToolOutput]) -> AssistantResult<Run> {
        if outputs.is_empty() {
            return Ok(run);
        }
        tracing::debug!(run = %run.id, count = outputs.len(), "submitting tool outputs");
        self.backend
            .submit_tool_outputs(&run.thread_id, &run.id, outputs)
    }

    /// Send a player-facing message and block until the assistant replies.
    ///
    /// All narration shares one thread, opened on first use, so the
    /// assistant keeps the story's context. Tool calls made during the run
    /// are served like in [`MessageBus::drain_pending`].
    pub fn narrate(&mut self, target: &mut T, content: &str) -> AssistantResult<String> {
        let thread = match &self.narrative_thread {
            Some(thread) => thread.clone(),
            None => {
                let thread = self.backend.create_thread()?;
                self.narrative_thread = Some(thread.clone());
                thread
            }
        };

        self.backend.create_message(&thread, content)?;
        let mut run = self.backend.create_run(&thread, &self.assistant_id)?;

        loop {
            match run.status {
                RunStatus::Completed => break,
                RunStatus::RequiresAction => {
                    let outputs = self.resolve_tool_calls(target, &run.tool_calls);
                    if outputs.is_empty() {
                        return Err(AssistantError::RunNotCompleted {
                            run: run.id,
                            status: run.status,
                        });
                    }
                    run = self.send_tool_outputs(run, &outputs)?;
                }
                status if status.is_pending() => {
                    tracing::debug!(run = %run.id, %status, "waiting on narrative run");
                    if !self.poll_interval.is_zero() {
                        thread::sleep(self.poll_interval);
                    }
                    run = self.backend.retrieve_run(&run.thread_id, &run.id)?;
                }
                status => {
                    return Err(AssistantError::RunNotCompleted {
                        run: run.id,
                        status,
                    });
                }
            }
        }

        self.backend
            .latest_message_text(&thread)?
            .ok_or(AssistantError::EmptyReply(thread))
    }
}

impl<T> fmt::Debug for MessageBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tools: Vec<_> = self.handlers.keys().map(|t| t.as_str()).collect();
        tools.sort_unstable();
        f.debug_struct("MessageBus")
            .field("backend", &self.backend)
            .field("assistant_id", &self.assistant_id)
            .field("pending", &self.pending.len())
            .field("tools", &tools)
            .field("narrative_thread", &self.narrative_thread)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptStep, ScriptedBackend};
    use proptest::prelude::*;
    use serde_json::json;

    /// Minimal handler target: records every payload it was given.
    #[derive(Debug, Default)]
    struct Ledger {
        calls: Vec<(&'static str, Value)>,
    }

    fn record_factions(ledger: &mut Ledger, args: &Value) -> Result<String, ToolError> {
        ledger.calls.push(("factions", args.clone()));
        Ok("OK".to_string())
    }

    fn record_locations(ledger: &mut Ledger, args: &Value) -> Result<String, ToolError> {
        ledger.calls.push(("locations", args.clone()));
        Ok("OK".to_string())
    }

    fn reject(_: &mut Ledger, _: &Value) -> Result<String, ToolError> {
        Err(ToolError::Rejected("nope".to_string()))
    }

    fn bus(backend: &ScriptedBackend) -> MessageBus<Ledger> {
        let mut bus = MessageBus::new(Box::new(backend.clone()), "asst_1")
            .with_poll_interval(Duration::ZERO);
        bus.register_handlers([
            (ToolName::RegisterFactions, record_factions as ToolHandler<Ledger>),
            (ToolName::RegisterLocations, record_locations as ToolHandler<Ledger>),
        ]);
        bus
    }

    fn faction_call(id: &str) -> ToolCall {
        ToolCall::new(
            id,
            "register_factions",
            json!({ "factions": [{ "name": "Renraku" }] }).to_string(),
        )
    }

    #[test]
    fn submit_enqueues_without_polling() {
        let backend = ScriptedBackend::new();
        let mut bus = bus(&backend);

        bus.submit("generate factions").unwrap();
        bus.submit("generate locations").unwrap();

        assert_eq!(bus.pending_len(), 2);
        assert_eq!(backend.retrieve_count(), 0);
        assert_eq!(backend.threads_created(), 2);
        assert_eq!(
            backend.messages().iter().map(|(_, m)| m.as_str()).collect::<Vec<_>>(),
            ["generate factions", "generate locations"]
        );
    }

    #[test]
    fn drain_on_empty_queue_is_noop() {
        let backend = ScriptedBackend::new();
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();

        bus.drain_pending(&mut ledger).unwrap();
        assert_eq!(backend.retrieve_count(), 0);
    }

    #[test]
    fn two_requests_reconcile_over_two_passes() {
        let backend = ScriptedBackend::new();
        backend.script_run([
            ScriptStep::Status(RunStatus::InProgress),
            ScriptStep::ToolCalls(vec![faction_call("call_1")]),
            ScriptStep::Status(RunStatus::Completed),
        ]);
        backend.script_run([
            ScriptStep::Status(RunStatus::InProgress),
            ScriptStep::Status(RunStatus::InProgress),
        ]);
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();
        bus.submit("factions").unwrap();
        bus.submit("locations").unwrap();

        bus.drain_pending(&mut ledger).unwrap();
        assert_eq!(bus.pending_len(), 2);
        assert!(ledger.calls.is_empty());

        bus.drain_pending(&mut ledger).unwrap();
        assert_eq!(ledger.calls.len(), 1);
        assert_eq!(ledger.calls[0].1["factions"][0]["name"], "Renraku");
        let submitted = backend.submitted_outputs();
        assert_eq!(submitted.len(), 1);
        assert_eq!(
            submitted[0].1,
            vec![ToolOutput {
                tool_call_id: "call_1".to_string(),
                output: "OK".to_string(),
            }]
        );
        // Submission puts the first run back to queued; the second is still running.
        assert_eq!(bus.pending_len(), 2);

        bus.drain_pending(&mut ledger).unwrap();
        // First run completes; second run's script is exhausted and completes too.
        assert_eq!(bus.pending_len(), 0);
    }

    #[test]
    fn completed_and_failed_runs_are_dropped() {
        let backend = ScriptedBackend::new();
        backend.script_run([ScriptStep::Status(RunStatus::Completed)]);
        backend.script_run([ScriptStep::Status(RunStatus::Failed)]);
        backend.script_run([ScriptStep::Status(RunStatus::Cancelling)]);
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();
        for prompt in ["a", "b", "c"] {
            bus.submit(prompt).unwrap();
        }

        bus.drain_pending(&mut ledger).unwrap();

        assert_eq!(bus.pending_len(), 1);
        assert_eq!(bus.pending().next().unwrap().status, RunStatus::Cancelling);
    }

    #[test]
    fn requeued_runs_not_repolled_in_same_pass() {
        let backend = ScriptedBackend::new();
        backend.script_run([
            ScriptStep::Status(RunStatus::Queued),
            ScriptStep::Status(RunStatus::Queued),
        ]);
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();
        bus.submit("a").unwrap();

        bus.drain_pending(&mut ledger).unwrap();

        assert_eq!(backend.retrieve_count(), 1);
        assert_eq!(bus.pending_len(), 1);
    }

    #[test]
    fn unknown_and_failing_tools_yield_error_output() {
        let backend = ScriptedBackend::new();
        let mut bus = bus(&backend);
        bus.register_handler(ToolName::RegisterLocations, reject);
        let mut ledger = Ledger::default();

        let calls = vec![
            faction_call("call_1"),
            ToolCall::new("call_2", "register_npcs", "{}"),
            ToolCall::new("call_3", "register_locations", "{\"locations\": []}"),
            ToolCall::new("call_4", "register_factions", "not json"),
        ];
        let outputs = bus.resolve_tool_calls(&mut ledger, &calls);

        let pairs: Vec<_> = outputs
            .iter()
            .map(|o| (o.tool_call_id.as_str(), o.output.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("call_1", "OK"),
                ("call_2", TOOL_ERROR),
                ("call_3", TOOL_ERROR),
                ("call_4", TOOL_ERROR),
            ]
        );
        assert_eq!(ledger.calls.len(), 1);
    }

    #[test]
    fn last_registration_wins() {
        let backend = ScriptedBackend::new();
        let mut bus = bus(&backend);
        bus.register_handler(ToolName::RegisterFactions, reject);
        let mut ledger = Ledger::default();

        let outputs = bus.resolve_tool_calls(&mut ledger, &[faction_call("call_1")]);
        assert_eq!(outputs[0].output, TOOL_ERROR);
        assert!(ledger.calls.is_empty());
    }

    #[test]
    fn unregistered_tool_is_error_even_when_known() {
        let backend = ScriptedBackend::new();
        let mut bus: MessageBus<Ledger> = MessageBus::new(Box::new(backend.clone()), "asst_1");
        assert!(!bus.has_handler(ToolName::RegisterFactions));
        let mut ledger = Ledger::default();

        let outputs = bus.resolve_tool_calls(&mut ledger, &[faction_call("call_1")]);
        assert_eq!(outputs[0].output, TOOL_ERROR);
        bus.register_handler(ToolName::RegisterFactions, record_factions);
        assert!(bus.has_handler(ToolName::RegisterFactions));
    }

    #[test]
    fn requires_action_without_calls_submits_nothing() {
        let backend = ScriptedBackend::new();
        backend.script_run([ScriptStep::ToolCalls(Vec::new())]);
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();
        bus.submit("a").unwrap();

        bus.drain_pending(&mut ledger).unwrap();

        assert!(backend.submitted_outputs().is_empty());
        assert_eq!(bus.pending_len(), 0);
    }

    #[test]
    fn backend_failure_propagates() {
        let backend = ScriptedBackend::new();
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();
        bus.submit("a").unwrap();
        backend.fail_next("connection reset");

        let err = bus.drain_pending(&mut ledger).unwrap_err();
        assert!(matches!(err, AssistantError::Api { .. }));
    }

    #[test]
    fn narrate_reuses_one_thread_and_returns_reply() {
        let backend = ScriptedBackend::new();
        backend.script_run([
            ScriptStep::Status(RunStatus::InProgress),
            ScriptStep::Status(RunStatus::Completed),
        ]);
        backend.reply("You wake up in a coffin hotel.");
        backend.reply("The fixer nods.");
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();

        let first = bus.narrate(&mut ledger, "opening scene").unwrap();
        let second = bus.narrate(&mut ledger, "talk to the fixer").unwrap();

        assert_eq!(first, "You wake up in a coffin hotel.");
        assert_eq!(second, "The fixer nods.");
        assert_eq!(backend.threads_created(), 1);
        let threads: Vec<_> = backend.messages().into_iter().map(|(t, _)| t).collect();
        assert_eq!(threads[0], threads[1]);
    }

    #[test]
    fn narrate_serves_tool_calls() {
        let backend = ScriptedBackend::new();
        backend.script_run([ScriptStep::ToolCalls(vec![faction_call("call_9")])]);
        backend.reply("A new power rises.");
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();

        let reply = bus.narrate(&mut ledger, "go on").unwrap();

        assert_eq!(reply, "A new power rises.");
        assert_eq!(ledger.calls.len(), 1);
        assert_eq!(backend.submitted_outputs().len(), 1);
    }

    #[test]
    fn narrate_failed_run_is_error() {
        let backend = ScriptedBackend::new();
        backend.script_run([ScriptStep::Status(RunStatus::Failed)]);
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();

        let err = bus.narrate(&mut ledger, "hello").unwrap_err();
        assert!(matches!(
            err,
            AssistantError::RunNotCompleted {
                status: RunStatus::Failed,
                ..
            }
        ));
    }

    #[test]
    fn narrate_without_reply_is_error() {
        let backend = ScriptedBackend::new();
        let mut bus = bus(&backend);
        let mut ledger = Ledger::default();

        let err = bus.narrate(&mut ledger, "hello").unwrap_err();
        assert!(matches!(err, AssistantError::EmptyReply(_)));
    }

    fn status_strategy() -> impl Strategy<Value = RunStatus> {
        prop_oneof![
            Just(RunStatus::Queued),
            Just(RunStatus::InProgress),
            Just(RunStatus::Cancelling),
            Just(RunStatus::Completed),
            Just(RunStatus::Failed),
            Just(RunStatus::Other),
        ]
    }

    proptest! {
        #[test]
        fn drain_keeps_exactly_the_pending_runs(statuses in prop::collection::vec(status_strategy(), 0..12)) {
            let backend = ScriptedBackend::new();
            for status in &statuses {
                backend.script_run([ScriptStep::Status(*status)]);
            }
            let mut bus = bus(&backend);
            let mut ledger = Ledger::default();
            for i in 0..statuses.len() {
                bus.submit(&format!("request {i}")).unwrap();
            }
            let submitted: Vec<_> = bus.pending().map(|r| r.id.clone()).collect();

            bus.drain_pending(&mut ledger).unwrap();

            let expected: Vec<_> = submitted
                .iter()
                .zip(&statuses)
                .filter(|(_, s)| s.is_pending())
                .map(|(id, _)| id.clone())
                .collect();
            let remaining: Vec<_> = bus.pending().map(|r| r.id.clone()).collect();
            prop_assert_eq!(remaining, expected);
            prop_assert_eq!(backend.retrieve_count(), statuses.len());
        }

        #[test]
        fn outputs_match_calls_in_order(names in prop::collection::vec(
            prop_oneof![
                Just("register_factions"),
                Just("register_locations"),
                Just("summon_dragon"),
            ],
            0..10,
        )) {
            let backend = ScriptedBackend::new();
            let bus = bus(&backend);
            let mut ledger = Ledger::default();
            let calls: Vec<_> = names
                .iter()
                .enumerate()
                .map(|(i, name)| ToolCall::new(format!("call_{i}"), *name, "{}"))
                .collect();

            let outputs = bus.resolve_tool_calls(&mut ledger, &calls);

            prop_assert_eq!(outputs.len(), calls.len());
            for (call, output) in calls.iter().zip(&outputs) {
                prop_assert_eq!(&output.tool_call_id, &call.id);
                let expected = if call.name == "summon_dragon" { TOOL_ERROR } else { "OK" };
                prop_assert_eq!(output.output.as_str(), expected);
            }
        }
    }
}
