//! Error types for backend communication and tool dispatch.

use thiserror::Error;

use crate::run::{RunId, RunStatus, ThreadId};

/// Result type for backend operations.
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Failures talking to the completion backend.
///
/// None of these are retried locally; they propagate to the game driver
/// and end the session.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The HTTP request could not be sent or its body not decoded.
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// A run settled in a state other than `completed`.
    #[error("run {run} settled as {status}")]
    RunNotCompleted {
        /// The run that failed.
        run: RunId,
        /// Its final status.
        status: RunStatus,
    },

    /// The thread has no textual reply to read.
    #[error("no assistant reply in thread {0}")]
    EmptyReply(ThreadId),
}

/// A tool call that could not be served.
///
/// Recovered inside the bus: the call gets the `"ERROR"` output and the
/// run continues.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No handler is registered under the requested name.
    #[error("no handler registered for tool \"{0}\"")]
    UnknownTool(String),

    /// The call's arguments are not valid JSON.
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    /// The handler rejected the payload.
    #[error("tool payload rejected: {0}")]
    Rejected(String),
}
