use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend handle of a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend handle of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a run as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Accepted but not started.
    Queued,
    /// The assistant is working.
    InProgress,
    /// Paused until the caller submits tool outputs.
    RequiresAction,
    /// Cancellation was requested and is in progress.
    Cancelling,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Any other terminal status (cancelled, expired, incomplete, ...).
    #[serde(other)]
    Other,
}

impl RunStatus {
    /// Whether the run is still moving on its own and worth polling again.
    ///
    /// `requires_action` is deliberately not in this set: the caller has to
    /// act on it in the same pass that observed it.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Queued | Self::InProgress | Self::Cancelling)
    }

    /// The status string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of one asynchronous run of the assistant over a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Run handle.
    pub id: RunId,
    /// Thread the run executes over.
    pub thread_id: ThreadId,
    /// Status at the time of the snapshot.
    pub status: RunStatus,
    /// Tool calls awaiting outputs; only populated for `requires_action`.
    pub tool_calls: Vec<ToolCall>,
}

impl Run {
    /// A run snapshot without pending tool calls.
    pub fn new(id: RunId, thread_id: ThreadId, status: RunStatus) -> Self {
        Self {
            id,
            thread_id,
            status,
            tool_calls: Vec::new(),
        }
    }
}

/// A request from the assistant to execute a named local function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Call handle, echoed back with the output.
    pub id: String,
    /// Function name.
    pub name: String,
    /// Arguments as serialized JSON text.
    pub arguments: String,
}

impl ToolCall {
    /// Build a tool call from its parts.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// The result of one tool call, submitted back to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    /// The call this answers.
    pub tool_call_id: String,
    /// Status string produced by the handler.
    pub output: String,
}
