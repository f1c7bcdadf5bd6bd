use std::fmt;

use crate::error::AssistantResult;
use crate::run::{Run, RunId, ThreadId, ToolOutput};
use crate::tool::ToolDefinition;

/// Everything needed to register an assistant identity with the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSpec {
    /// Display name of the assistant.
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// System instructions.
    pub instructions: String,
    /// Tools the assistant may call mid-run.
    pub tools: Vec<ToolDefinition>,
}

/// The remote completion service.
///
/// Implementations are blocking: each method performs one request and
/// returns once the backend has answered. Runs progress on the backend's
/// side and are observed through [`AssistantBackend::retrieve_run`].
pub trait AssistantBackend: fmt::Debug {
    /// Register an assistant and return its id.
    fn create_assistant(&self, spec: &AssistantSpec) -> AssistantResult<String>;

    /// Open a new, empty conversation thread.
    fn create_thread(&self) -> AssistantResult<ThreadId>;

    /// Post a user message into a thread.
    fn create_message(&self, thread: &ThreadId, content: &str) -> AssistantResult<()>;

    /// Start a run of the assistant over a thread.
    fn create_run(&self, thread: &ThreadId, assistant_id: &str) -> AssistantResult<Run>;

    /// Fetch the current state of a run.
    fn retrieve_run(&self, thread: &ThreadId, run: &RunId) -> AssistantResult<Run>;

    /// Answer the tool calls of a run that requires action.
    fn submit_tool_outputs(
        &self,
        thread: &ThreadId,
        run: &RunId,
        outputs: &[ToolOutput],
    ) -> AssistantResult<Run>;

    /// Text of the most recent message in a thread, if it has any.
    fn latest_message_text(&self, thread: &ThreadId) -> AssistantResult<Option<String>>;
}
