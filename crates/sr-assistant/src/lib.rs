//! Assistant backend client and tool dispatch bus for Sprawl Runner.
//!
//! The completion backend runs the assistant asynchronously: a request is
//! posted, a run is started, and the run has to be polled until it settles.
//! Mid-run the assistant may ask the caller to execute local tools. The
//! [`MessageBus`] owns the in-flight runs and reconciles them with the
//! registered tool handlers; [`AssistantBackend`] is the seam to the remote
//! service, implemented over HTTP by [`OpenAiClient`].

/// Backend trait and assistant registration.
pub mod backend;
/// Tool dispatch bus.
pub mod bus;
/// Error types for backend communication and tool dispatch.
pub mod error;
/// Blocking HTTP adapter for the OpenAI Assistants API.
pub mod openai;
/// Runs, threads, and tool-call wire types.
pub mod run;
/// Scripted in-memory backend for tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Tool names and their JSON-schema definitions.
pub mod tool;

pub use backend::{AssistantBackend, AssistantSpec};
pub use bus::{MessageBus, TOOL_ERROR, ToolHandler};
pub use error::{AssistantError, AssistantResult, ToolError};
pub use openai::OpenAiClient;
pub use run::{Run, RunId, RunStatus, ThreadId, ToolCall, ToolOutput};
pub use tool::{ToolDefinition, ToolName};
