//! Scripted in-memory backend for tests.
//!
//! Every created run replays the next script handed to
//! [`ScriptedBackend::script_run`]: each `retrieve_run` pops one step, and
//! an exhausted (or absent) script reports `completed`. Submitting tool
//! outputs puts the run back to `queued`. Clones share state, so a test can
//! keep a handle after boxing one into a bus.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::backend::{AssistantBackend, AssistantSpec};
use crate::error::{AssistantError, AssistantResult};
use crate::run::{Run, RunId, RunStatus, ThreadId, ToolCall, ToolOutput};

/// One scripted observation of a run.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// The run reports this status with no tool calls.
    Status(RunStatus),
    /// The run requires action with these tool calls.
    ToolCalls(Vec<ToolCall>),
}

#[derive(Debug, Default)]
struct ScriptState {
    threads: u32,
    runs: u32,
    scripts: VecDeque<VecDeque<ScriptStep>>,
    active: HashMap<RunId, VecDeque<ScriptStep>>,
    replies: VecDeque<String>,
    messages: Vec<(ThreadId, String)>,
    submitted: Vec<(RunId, Vec<ToolOutput>)>,
    assistants: Vec<AssistantSpec>,
    retrieves: usize,
    failure: Option<String>,
}

/// Deterministic stand-in for a completion backend.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedBackend {
    /// An empty backend: runs complete on first poll and no replies exist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the script for the next run to be created.
    pub fn script_run(&self, steps: impl IntoIterator<Item = ScriptStep>) {
        self.state
            .borrow_mut()
            .scripts
            .push_back(steps.into_iter().collect());
    }

    /// Queue the text returned by the next `latest_message_text` call.
    pub fn reply(&self, text: impl Into<String>) {
        self.state.borrow_mut().replies.push_back(text.into());
    }

    /// Make the next backend call fail with an API error.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state.borrow_mut().failure = Some(message.into());
    }

    /// Every message posted, with its thread.
    pub fn messages(&self) -> Vec<(ThreadId, String)> {
        self.state.borrow().messages.clone()
    }

    /// Every batch of tool outputs submitted, with its run.
    pub fn submitted_outputs(&self) -> Vec<(RunId, Vec<ToolOutput>)> {
        self.state.borrow().submitted.clone()
    }

    /// Every assistant registered.
    pub fn created_assistants(&self) -> Vec<AssistantSpec> {
        self.state.borrow().assistants.clone()
    }

    /// Number of threads created.
    pub fn threads_created(&self) -> u32 {
        self.state.borrow().threads
    }

    /// Number of runs started.
    pub fn runs_created(&self) -> u32 {
        self.state.borrow().runs
    }

    /// Number of `retrieve_run` calls served.
    pub fn retrieve_count(&self) -> usize {
        self.state.borrow().retrieves
    }

    fn check_failure(&self) -> AssistantResult<()> {
        match self.state.borrow_mut().failure.take() {
            Some(message) => Err(AssistantError::Api {
                status: 500,
                message,
            }),
            None => Ok(()),
        }
    }
}

impl AssistantBackend for ScriptedBackend {
    fn create_assistant(&self, spec: &AssistantSpec) -> AssistantResult<String> {
        self.check_failure()?;
        let mut state = self.state.borrow_mut();
        state.assistants.push(spec.clone());
        Ok(format!("asst_{}", state.assistants.len()))
    }

    fn create_thread(&self) -> AssistantResult<ThreadId> {
        self.check_failure()?;
        let mut state = self.state.borrow_mut();
        state.threads += 1;
        Ok(ThreadId(format!("thread_{}", state.threads)))
    }

    fn create_message(&self, thread: &ThreadId, content: &str) -> AssistantResult<()> {
        self.check_failure()?;
        self.state
            .borrow_mut()
            .messages
            .push((thread.clone(), content.to_string()));
        Ok(())
    }

    fn create_run(&self, thread: &ThreadId, _assistant_id: &str) -> AssistantResult<Run> {
        self.check_failure()?;
        let mut state = self.state.borrow_mut();
        state.runs += 1;
        let id = RunId(format!("run_{}", state.runs));
        let script = state.scripts.pop_front().unwrap_or_default();
        state.active.insert(id.clone(), script);
        Ok(Run::new(id, thread.clone(), RunStatus::Queued))
    }

    fn retrieve_run(&self, thread: &ThreadId, run: &RunId) -> AssistantResult<Run> {
        self.check_failure()?;
        let mut state = self.state.borrow_mut();
        state.retrieves += 1;
        let step = state.active.get_mut(run).and_then(|s| s.pop_front());
        Ok(match step {
            Some(ScriptStep::Status(status)) => Run::new(run.clone(), thread.clone(), status),
            Some(ScriptStep::ToolCalls(calls)) => Run {
                id: run.clone(),
                thread_id: thread.clone(),
                status: RunStatus::RequiresAction,
                tool_calls: calls,
            },
            None => Run::new(run.clone(), thread.clone(), RunStatus::Completed),
        })
    }

    fn submit_tool_outputs(
        &self,
        thread: &ThreadId,
        run: &RunId,
        outputs: &[ToolOutput],
    ) -> AssistantResult<Run> {
        self.check_failure()?;
        self.state
            .borrow_mut()
            .submitted
            .push((run.clone(), outputs.to_vec()));
        Ok(Run::new(run.clone(), thread.clone(), RunStatus::Queued))
    }

    fn latest_message_text(&self, _thread: &ThreadId) -> AssistantResult<Option<String>> {
        self.check_failure()?;
        Ok(self.state.borrow_mut().replies.pop_front())
    }
}
